//! Human-readable renderings of a [`ContextBundle`] breakdown.
//!
//! Both renderers return a `String`; printing is left to the caller.

use std::fmt::Write;

use crate::context::assembler::ContextBundle;
use crate::context::section::{Section, SectionResult};

const RULE_WIDTH: usize = 70;
/// Utilization above this percentage is flagged as near the limit.
const NEAR_LIMIT_PCT: f64 = 90.0;

/// Per-section status shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Truncated,
    NearLimit,
    Ok,
}

impl SectionStatus {
    pub fn of(result: &SectionResult) -> Self {
        if result.truncated {
            Self::Truncated
        } else if result.utilization_pct() > NEAR_LIMIT_PCT {
            Self::NearLimit
        } else {
            Self::Ok
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Truncated => "⚠ TRUNCATED",
            Self::NearLimit => "⚠ NEAR LIMIT",
            Self::Ok => "✓ OK",
        }
    }
}

/// Multi-line console report, one block per section.
pub fn render_console(bundle: &ContextBundle) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "CONTEXT BUDGET BREAKDOWN");
    let _ = writeln!(out, "{rule}");

    for (section, result) in bundle.breakdown.iter() {
        let _ = writeln!(
            out,
            "\n{}: {}/{} tokens ({:.0}%) {}",
            section.as_str().to_uppercase(),
            result.tokens_used,
            result.budget,
            result.utilization_pct(),
            SectionStatus::of(result).label()
        );
        let _ = writeln!(out, "  Source: {}", result.source);

        if !result.truncated {
            continue;
        }
        match (section, result.retrieval) {
            (Section::Retrieval, Some(stats)) => {
                let _ = writeln!(
                    out,
                    "  → Kept {} chunks, dropped {} chunks",
                    stats.chunks_kept, stats.chunks_dropped
                );
                let _ = writeln!(
                    out,
                    "  → Original retrieval: {} tokens",
                    stats.original_tokens.unwrap_or(0)
                );
            }
            _ => {
                let _ = writeln!(out, "  → Content was truncated to fit budget");
            }
        }
    }

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "TOTAL CONTEXT: {} tokens", bundle.total_tokens);
    let _ = writeln!(out, "{rule}");
    out
}

/// Compact table: rows Tokens / Status / Source, one column per section.
///
/// When the retrieval section overflowed, a warning line with its chunk
/// accounting follows the table.
pub fn render_table(bundle: &ContextBundle) -> String {
    let mut header = vec![String::new()];
    let mut tokens = vec!["Tokens".to_string()];
    let mut status = vec!["Status".to_string()];
    let mut source = vec!["Source".to_string()];

    for (section, result) in bundle.breakdown.iter() {
        header.push(section.title().to_string());
        tokens.push(format!("{}/{}", result.tokens_used, result.budget));
        status.push(if result.truncated {
            SectionStatus::Truncated.label().to_string()
        } else {
            format!("{:.0}%", result.utilization_pct())
        });
        source.push(result.source.clone());
    }

    let rows = [header, tokens, status, source];
    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }

    let retrieval = &bundle.breakdown.retrieval;
    if bundle.overflow && retrieval.truncated {
        let (kept, dropped, original) = match retrieval.retrieval {
            Some(s) => (
                s.chunks_kept,
                s.chunks_dropped,
                s.original_tokens
                    .map_or_else(|| "N/A".to_string(), |t| t.to_string()),
            ),
            None => (0, 0, "N/A".to_string()),
        };
        let _ = writeln!(
            out,
            "\n⚠ Budget Overflow: Kept {kept} chunks, dropped {dropped} chunks (Original: {original} tokens)"
        );
    }

    let _ = writeln!(out, "\nTotal Context: {} tokens", bundle.total_tokens);
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ctxbudget_config::BudgetTable;
    use ctxbudget_core::RetrievedChunk;

    use super::*;
    use crate::context::assembler::{ContextAssembler, ContextInput};
    use crate::context::token::CharEstimateTokenizer;

    fn assembler(budgets: BudgetTable) -> ContextAssembler {
        ContextAssembler::new(Arc::new(CharEstimateTokenizer), budgets, "Follow policy.")
    }

    fn result(tokens_used: usize, budget: usize, truncated: bool) -> SectionResult {
        SectionResult {
            content: String::new(),
            tokens_used,
            budget,
            truncated,
            source: "System prompt".into(),
            retrieval: None,
        }
    }

    #[test]
    fn status_precedence() {
        assert_eq!(SectionStatus::of(&result(100, 100, true)), SectionStatus::Truncated);
        assert_eq!(SectionStatus::of(&result(95, 100, false)), SectionStatus::NearLimit);
        assert_eq!(SectionStatus::of(&result(90, 100, false)), SectionStatus::Ok);
        assert_eq!(SectionStatus::of(&result(0, 0, false)), SectionStatus::Ok);
    }

    #[test]
    fn console_report_for_quiet_turn() {
        let bundle = assembler(BudgetTable::default())
            .assemble(&ContextInput::new("Hi"))
            .unwrap();
        let report = render_console(&bundle);

        assert!(report.starts_with(&format!("\n{}\nCONTEXT BUDGET BREAKDOWN\n", "=".repeat(70))));
        // "Follow policy." is 14 bytes → 4 tokens; 4/255 rounds to 2%.
        assert!(report.contains("\nINSTRUCTIONS: 4/255 tokens (2%) ✓ OK\n  Source: System prompt\n"));
        assert!(report.contains("\nRETRIEVAL: 7/550 tokens (1%) ✓ OK\n  Source: Vector database\n"));
        assert!(report.contains("\nTOOL_OUTPUTS: "));
        assert!(report.contains(&format!("TOTAL CONTEXT: {} tokens", bundle.total_tokens)));
        assert!(!report.contains("→"));
    }

    #[test]
    fn console_report_explains_truncation() {
        let budgets = BudgetTable {
            memory: 5,
            retrieval: 60,
            ..BudgetTable::default()
        };
        let memory = vec!["remembered fact number one".to_string(); 3];
        let chunks: Vec<_> = (0..3)
            .map(|_| RetrievedChunk::new("r".repeat(120), "p.txt"))
            .collect();
        let input = ContextInput {
            memory_items: &memory,
            retrieved_chunks: &chunks,
            ..ContextInput::new("Hi")
        };
        let bundle = assembler(budgets).assemble(&input).unwrap();
        let report = render_console(&bundle);

        assert!(report.contains("MEMORY: 5/5 tokens (100%) ⚠ TRUNCATED"));
        assert!(report.contains("  → Content was truncated to fit budget"));
        // header 9 + one entry ceil(140/4)=35 → 44; the second would reach 79.
        assert!(report.contains("RETRIEVAL: 44/60 tokens (73%) ⚠ TRUNCATED"));
        assert!(report.contains("  → Kept 1 chunks, dropped 2 chunks"));
        assert!(report.contains("  → Original retrieval: 90 tokens"));
    }

    #[test]
    fn table_has_header_and_three_rows() {
        let bundle = assembler(BudgetTable::default())
            .assemble(&ContextInput::new("Hi"))
            .unwrap();
        let table = render_table(&bundle);
        let lines: Vec<_> = table.lines().collect();

        assert!(lines[0].contains("Instructions"));
        assert!(lines[0].contains("Tool Outputs"));
        assert!(lines[1].starts_with("Tokens"));
        assert!(lines[1].contains("7/550"));
        assert!(lines[2].starts_with("Status"));
        assert!(lines[3].starts_with("Source"));
        assert!(lines[3].contains("Vector database"));
        assert!(!table.contains("Budget Overflow"));
        assert!(table.ends_with(&format!("Total Context: {} tokens\n", bundle.total_tokens)));
    }

    #[test]
    fn table_warns_on_retrieval_overflow() {
        let budgets = BudgetTable {
            retrieval: 60,
            ..BudgetTable::default()
        };
        let chunks: Vec<_> = (0..3)
            .map(|_| RetrievedChunk::new("r".repeat(120), "p.txt"))
            .collect();
        let input = ContextInput {
            retrieved_chunks: &chunks,
            ..ContextInput::new("Hi")
        };
        let bundle = assembler(budgets).assemble(&input).unwrap();
        let table = render_table(&bundle);

        assert!(table.contains("⚠ TRUNCATED"));
        assert!(table.contains(
            "⚠ Budget Overflow: Kept 1 chunks, dropped 2 chunks (Original: 90 tokens)"
        ));
    }
}
