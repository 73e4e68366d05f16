//! Section identities and the uniform per-section result record.

use ctxbudget_config::BudgetTable;
use serde::Serialize;

/// The five budgeted parts of an assembled context, in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Instructions,
    Goal,
    Memory,
    Retrieval,
    ToolOutputs,
}

impl Section {
    /// Every section, in the fixed assembly order.
    pub const ALL: [Section; 5] = [
        Section::Instructions,
        Section::Goal,
        Section::Memory,
        Section::Retrieval,
        Section::ToolOutputs,
    ];

    /// Machine name (`tool_outputs`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Instructions => "instructions",
            Section::Goal => "goal",
            Section::Memory => "memory",
            Section::Retrieval => "retrieval",
            Section::ToolOutputs => "tool_outputs",
        }
    }

    /// Column heading for tabular reports.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Instructions => "Instructions",
            Section::Goal => "Goal",
            Section::Memory => "Memory",
            Section::Retrieval => "Retrieval",
            Section::ToolOutputs => "Tool Outputs",
        }
    }

    /// This section's allotment in `table`.
    pub fn budget(&self, table: &BudgetTable) -> usize {
        match self {
            Section::Instructions => table.instructions,
            Section::Goal => table.goal,
            Section::Memory => table.memory,
            Section::Retrieval => table.retrieval,
            Section::ToolOutputs => table.tool_outputs,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one section builder produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionResult {
    /// Final (possibly truncated) text.
    pub content: String,
    /// Tokens charged against the budget.
    pub tokens_used: usize,
    /// The section's allotment.
    pub budget: usize,
    /// Whether `content` was reduced from its natural form.
    pub truncated: bool,
    /// Provenance label, static per section type.
    pub source: String,
    /// Chunk accounting; present on the retrieval section only.
    #[serde(flatten)]
    pub retrieval: Option<RetrievalStats>,
}

/// Chunk accounting for the retrieval section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrievalStats {
    pub chunks_kept: usize,
    pub chunks_dropped: usize,
    /// Token count of every supplied chunk's raw content. Absent when no
    /// chunks were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_tokens: Option<usize>,
}

impl SectionResult {
    /// Share of the budget used, as a percentage. Zero budgets report 0.
    pub fn utilization_pct(&self) -> f64 {
        if self.budget == 0 {
            return 0.0;
        }
        self.tokens_used as f64 / self.budget as f64 * 100.0
    }
}
