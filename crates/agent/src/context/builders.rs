//! The five section builders.
//!
//! Each builder renders its section's natural text, then applies its own
//! degradation policy when that text exceeds the section budget:
//!
//! | Section | Natural form | On overflow |
//! |---------|--------------|-------------|
//! | Instructions | operator text | prefix-truncate |
//! | Goal | question + last 3 turns | drop all history |
//! | Memory | all facts | keep last 2, then prefix-truncate |
//! | Retrieval | ranked chunks | skip chunks that do not fit, one partial chunk |
//! | Tool outputs | last 3 results | prefix-truncate |
//!
//! Truncation is reported through [`SectionResult::truncated`], never as an
//! error. Only tokenizer failures propagate.

use ctxbudget_core::{HistoryTurn, RetrievedChunk, TokenizerError};
use tracing::debug;

use crate::context::section::{RetrievalStats, Section, SectionResult};
use crate::context::token::Tokenizer;

/// Turns of history rendered into the goal section.
pub const GOAL_HISTORY_TURNS: usize = 3;
/// Characters of each history turn rendered into the goal section.
pub const GOAL_TURN_CHARS: usize = 200;
/// Facts kept when memory overflows.
pub const MEMORY_FALLBACK_ITEMS: usize = 2;
/// Tool results considered at all.
pub const TOOL_OUTPUT_WINDOW: usize = 3;

/// Partial inclusion needs strictly more than this much budget left.
pub const PARTIAL_MIN_REMAINING: usize = 100;
/// Partial inclusion is only offered while fewer than this many chunks are kept.
pub const PARTIAL_MAX_KEPT: usize = 2;
/// Tokens held back from a partial chunk for its label and marker.
pub const PARTIAL_RESERVE: usize = 50;

pub const MEMORY_PLACEHOLDER: &str = "No prior conversation context.";
pub const RETRIEVAL_PLACEHOLDER: &str = "No relevant policy documents found.";
/// Charged for the empty-retrieval placeholder without recounting.
pub const RETRIEVAL_PLACEHOLDER_TOKENS: usize = 7;
pub const TOOL_OUTPUTS_PLACEHOLDER: &str = "No recent tool outputs.";
pub const RETRIEVAL_HEADER: &str = "=== RELEVANT POLICY SECTIONS ===\n\n";

pub const INSTRUCTIONS_SOURCE: &str = "System prompt";
pub const GOAL_SOURCE: &str = "User input + conversation history";
pub const MEMORY_SOURCE: &str = "Conversation memory store";
pub const RETRIEVAL_EMPTY_SOURCE: &str = "Vector database";
pub const RETRIEVAL_SOURCE: &str = "Vector database retrieval";
pub const TOOL_OUTPUTS_SOURCE: &str = "Tool execution history";

/// Operator instructions: pass through, or prefix-truncate to the budget.
pub fn build_instructions(
    tokenizer: &dyn Tokenizer,
    instructions: &str,
    budget: usize,
) -> Result<SectionResult, TokenizerError> {
    let tokens = tokenizer.count(instructions);

    let (content, tokens_used, truncated) = if tokens > budget {
        let cut = tokenizer.truncate_to_budget(instructions, budget)?;
        debug!(section = %Section::Instructions, tokens, budget, "instructions truncated");
        (cut.text, cut.tokens, cut.truncated)
    } else {
        (instructions.to_string(), tokens, false)
    };

    Ok(SectionResult {
        content,
        tokens_used,
        budget,
        truncated,
        source: INSTRUCTIONS_SOURCE.into(),
        retrieval: None,
    })
}

/// Current question plus recent dialogue.
///
/// The question is never dropped. If the question line alone exceeds the
/// budget the result is over budget, still flagged as truncated.
pub fn build_goal(
    tokenizer: &dyn Tokenizer,
    question: &str,
    history: &[HistoryTurn],
    budget: usize,
) -> SectionResult {
    let mut goal = format!("Current Question: {question}\n\n");

    if !history.is_empty() {
        goal.push_str("Recent Conversation:\n");
        let start = history.len().saturating_sub(GOAL_HISTORY_TURNS);
        for turn in &history[start..] {
            let content: String = turn.content.chars().take(GOAL_TURN_CHARS).collect();
            goal.push_str(&format!("{}: {}\n", turn.role, content));
        }
    }

    let mut tokens_used = tokenizer.count(&goal);
    let truncated = tokens_used > budget;

    if truncated {
        debug!(section = %Section::Goal, tokens = tokens_used, budget, "history dropped");
        goal = format!("Current Question: {question}");
        tokens_used = tokenizer.count(&goal);
    }

    SectionResult {
        content: goal,
        tokens_used,
        budget,
        truncated,
        source: GOAL_SOURCE.into(),
        retrieval: None,
    }
}

/// Long-term memory facts, oldest first.
pub fn build_memory(
    tokenizer: &dyn Tokenizer,
    memory_items: &[String],
    budget: usize,
) -> Result<SectionResult, TokenizerError> {
    let mut memory = if memory_items.is_empty() {
        MEMORY_PLACEHOLDER.to_string()
    } else {
        memory_items.join("\n")
    };

    let mut tokens_used = tokenizer.count(&memory);
    let truncated = tokens_used > budget;

    if truncated {
        let start = memory_items.len().saturating_sub(MEMORY_FALLBACK_ITEMS);
        memory = memory_items[start..].join("\n");
        tokens_used = tokenizer.count(&memory);

        if tokens_used > budget {
            let cut = tokenizer.truncate_to_budget(&memory, budget)?;
            memory = cut.text;
            tokens_used = cut.tokens;
        }

        debug!(
            section = %Section::Memory,
            items = memory_items.len(),
            tokens = tokens_used,
            budget,
            "memory reduced to latest facts"
        );
    }

    Ok(SectionResult {
        content: memory,
        tokens_used,
        budget,
        truncated,
        source: MEMORY_SOURCE.into(),
        retrieval: None,
    })
}

/// Retrieved chunks, already ranked most relevant first.
///
/// Chunks are packed in the given order. A chunk that does not fit is
/// skipped and packing continues, so a later smaller chunk can still be
/// kept. While fewer than two chunks are kept and more than 100 tokens
/// remain, an oversized chunk is instead included partially; that ends the
/// walk and every chunk not kept counts as dropped.
pub fn build_retrieval(
    tokenizer: &dyn Tokenizer,
    chunks: &[RetrievedChunk],
    budget: usize,
) -> Result<SectionResult, TokenizerError> {
    if chunks.is_empty() {
        return Ok(SectionResult {
            content: RETRIEVAL_PLACEHOLDER.into(),
            tokens_used: RETRIEVAL_PLACEHOLDER_TOKENS,
            budget,
            truncated: false,
            source: RETRIEVAL_EMPTY_SOURCE.into(),
            retrieval: Some(RetrievalStats {
                chunks_kept: 0,
                chunks_dropped: 0,
                original_tokens: None,
            }),
        });
    }

    let mut content = String::from(RETRIEVAL_HEADER);
    let mut used = tokenizer.count(&content);
    let mut kept = 0;
    let mut dropped = 0;
    let mut partial_used = false;

    for (index, chunk) in chunks.iter().enumerate() {
        if partial_used {
            break;
        }
        let number = index + 1;

        let entry = format!("[Source {number}: {}]\n{}\n\n", chunk.source, chunk.content);
        let entry_tokens = tokenizer.count(&entry);

        if used + entry_tokens <= budget {
            content.push_str(&entry);
            used += entry_tokens;
            kept += 1;
            continue;
        }

        let remaining = budget.saturating_sub(used);
        if remaining > PARTIAL_MIN_REMAINING && kept < PARTIAL_MAX_KEPT {
            let partial =
                tokenizer.truncate_to_budget(&chunk.content, remaining - PARTIAL_RESERVE)?;
            content.push_str(&format!(
                "[Source {number}: {}]\n{}...[TRUNCATED]\n\n",
                chunk.source, partial.text
            ));
            used = budget;
            kept += 1;
            dropped = chunks.len() - kept;
            partial_used = true;
        } else {
            dropped += 1;
        }
    }

    let original_tokens: usize = chunks.iter().map(|c| tokenizer.count(&c.content)).sum();
    let truncated = dropped > 0;

    if truncated || partial_used {
        debug!(
            section = %Section::Retrieval,
            kept,
            dropped,
            partial = partial_used,
            original_tokens,
            budget,
            "retrieval chunks dropped"
        );
    }

    Ok(SectionResult {
        content,
        tokens_used: used,
        budget,
        truncated,
        source: RETRIEVAL_SOURCE.into(),
        retrieval: Some(RetrievalStats {
            chunks_kept: kept,
            chunks_dropped: dropped,
            original_tokens: Some(original_tokens),
        }),
    })
}

/// The most recent tool results.
///
/// Overflow keeps the token prefix of the windowed join, so the oldest of
/// the kept results survives and the newest is cut.
pub fn build_tool_outputs(
    tokenizer: &dyn Tokenizer,
    tool_results: &[String],
    budget: usize,
) -> Result<SectionResult, TokenizerError> {
    let joined = if tool_results.is_empty() {
        TOOL_OUTPUTS_PLACEHOLDER.to_string()
    } else {
        let start = tool_results.len().saturating_sub(TOOL_OUTPUT_WINDOW);
        tool_results[start..].join("\n\n")
    };

    let tokens = tokenizer.count(&joined);

    let (content, tokens_used, truncated) = if tokens > budget {
        let cut = tokenizer.truncate_to_budget(&joined, budget)?;
        debug!(section = %Section::ToolOutputs, tokens, budget, "tool outputs truncated");
        (cut.text, cut.tokens, true)
    } else {
        (joined, tokens, false)
    };

    Ok(SectionResult {
        content,
        tokens_used,
        budget,
        truncated,
        source: TOOL_OUTPUTS_SOURCE.into(),
        retrieval: None,
    })
}
