//! Five-section context assembly.
//!
//! Sections are built in a fixed order, each against its own budget:
//!
//! 1. **Instructions** (operator rules): prefix-truncated
//! 2. **Goal** (question + recent dialogue): history dropped first
//! 3. **Memory** (long-term facts): latest two kept
//! 4. **Retrieval** (ranked chunks): skip-and-continue packing
//! 5. **Tool outputs** (recent results): prefix-truncated
//!
//! There is no global re-trim. The sum of the five budgets is the only
//! overall ceiling.
//!
//! # Determinism
//!
//! Identical inputs always produce byte-identical output. The assembler
//! holds no state between calls.

use std::sync::Arc;

use ctxbudget_config::{AppConfig, BudgetTable};
use ctxbudget_core::{HistoryTurn, RetrievedChunk, TokenizerError};
use serde::{Deserialize, Serialize};

use crate::context::builders;
use crate::context::section::{Section, SectionResult};
use crate::context::token::{self, Tokenizer};

// ── Types ─────────────────────────────────────────────────────────────────

/// All inputs for a single assembly. Borrowed; never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ContextInput<'a> {
    /// The current turn.
    pub question: &'a str,
    /// Conversation history, oldest first.
    pub history: &'a [HistoryTurn],
    /// Long-term memory facts, oldest first.
    pub memory_items: &'a [String],
    /// Retrieved chunks, pre-sorted by relevance (descending).
    pub retrieved_chunks: &'a [RetrievedChunk],
    /// Tool execution results, oldest first.
    pub tool_results: &'a [String],
}

impl<'a> ContextInput<'a> {
    /// Input with only a question; every collection empty.
    pub fn new(question: &'a str) -> Self {
        Self {
            question,
            history: &[],
            memory_items: &[],
            retrieved_chunks: &[],
            tool_results: &[],
        }
    }
}

/// Owned, deserializable form of [`ContextInput`] (e.g. a JSON request file).
///
/// Absent collections read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextRequest {
    pub question: String,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    #[serde(default)]
    pub memory_items: Vec<String>,
    #[serde(default)]
    pub retrieved_chunks: Vec<RetrievedChunk>,
    #[serde(default)]
    pub tool_results: Vec<String>,
}

impl ContextRequest {
    pub fn as_input(&self) -> ContextInput<'_> {
        ContextInput {
            question: &self.question,
            history: &self.history,
            memory_items: &self.memory_items,
            retrieved_chunks: &self.retrieved_chunks,
            tool_results: &self.tool_results,
        }
    }
}

/// Per-section diagnostics, in fixed assembly order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub instructions: SectionResult,
    pub goal: SectionResult,
    pub memory: SectionResult,
    pub retrieval: SectionResult,
    pub tool_outputs: SectionResult,
}

impl Breakdown {
    /// The result for one section.
    pub fn get(&self, section: Section) -> &SectionResult {
        match section {
            Section::Instructions => &self.instructions,
            Section::Goal => &self.goal,
            Section::Memory => &self.memory,
            Section::Retrieval => &self.retrieval,
            Section::ToolOutputs => &self.tool_outputs,
        }
    }

    /// Sections with their results, in assembly order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionResult)> {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// The assembled context, ready to be combined with the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextBundle {
    /// The five section contents laid into the fixed template.
    pub assembled_text: String,
    /// Per-section diagnostics.
    pub breakdown: Breakdown,
    /// True iff any section was truncated.
    pub overflow: bool,
    /// Sum of every section's `tokens_used`.
    pub total_tokens: usize,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The context assembler. Holds only immutable settings, so one instance
/// can be reused and shared.
#[derive(Clone)]
pub struct ContextAssembler {
    tokenizer: Arc<dyn Tokenizer>,
    budgets: BudgetTable,
    instructions: String,
}

impl ContextAssembler {
    /// Create an assembler with an explicit tokenizer, budgets, and
    /// instructions.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        budgets: BudgetTable,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            tokenizer,
            budgets,
            instructions: instructions.into(),
        }
    }

    /// Build an assembler from application config, loading its tokenizer.
    pub fn from_config(config: &AppConfig) -> Result<Self, TokenizerError> {
        let tokenizer = token::tokenizer_for(&config.tokenizer.encoding)?;
        Ok(Self::new(tokenizer, config.budgets, config.instructions.clone()))
    }

    pub fn budgets(&self) -> &BudgetTable {
        &self.budgets
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Assemble the context from all five sections.
    ///
    /// # Algorithm
    ///
    /// 1. Build each section against its own budget, in fixed order
    /// 2. Lay the five contents into the template
    /// 3. Aggregate overflow (any truncation) and total tokens
    ///
    /// Only a tokenizer failure is an error; oversized input is reported
    /// through the breakdown.
    pub fn assemble(&self, input: &ContextInput<'_>) -> Result<ContextBundle, TokenizerError> {
        let tok = self.tokenizer.as_ref();

        let breakdown = Breakdown {
            instructions: builders::build_instructions(
                tok,
                &self.instructions,
                self.budgets.instructions,
            )?,
            goal: builders::build_goal(tok, input.question, input.history, self.budgets.goal),
            memory: builders::build_memory(tok, input.memory_items, self.budgets.memory)?,
            retrieval: builders::build_retrieval(
                tok,
                input.retrieved_chunks,
                self.budgets.retrieval,
            )?,
            tool_outputs: builders::build_tool_outputs(
                tok,
                input.tool_results,
                self.budgets.tool_outputs,
            )?,
        };

        let assembled_text = render_template(&breakdown);
        let overflow = breakdown.iter().any(|(_, r)| r.truncated);
        let total_tokens = breakdown.iter().map(|(_, r)| r.tokens_used).sum();

        Ok(ContextBundle {
            assembled_text,
            breakdown,
            overflow,
            total_tokens,
        })
    }
}

/// Lay the section contents into the fixed layout.
///
/// Callers may parse the assembled text by fixed offsets, so this layout
/// (including its four-space indentation) must stay byte-for-byte stable.
fn render_template(b: &Breakdown) -> String {
    format!(
        "\n    {}\n\n    ---\n\n    {}\n\n    ---\n\n    Memory:\n    {}\n\n    ---\n\n    {}\n\n    ---\n\n    Tool Outputs:\n    {}\n    ",
        b.instructions.content,
        b.goal.content,
        b.memory.content,
        b.retrieval.content,
        b.tool_outputs.content,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────
