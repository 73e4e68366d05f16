//! Caller-side conversation state carried between turns.
//!
//! The assembler is stateless; a [`Session`] owns the history, memory facts
//! and tool results that feed it, and keeps the history window bounded.

use ctxbudget_config::SessionConfig;
use ctxbudget_core::HistoryTurn;

use crate::context::ContextInput;

/// Rolling conversation state for one user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: Vec<HistoryTurn>,
    memory_items: Vec<String>,
    tool_results: Vec<String>,
    max_history_turns: usize,
    answer_chars: usize,
}

impl Session {
    /// `max_history_turns` counts entries, so one exchange uses two.
    pub fn new(max_history_turns: usize, answer_chars: usize) -> Self {
        Self {
            max_history_turns,
            answer_chars,
            ..Self::default()
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.max_history_turns, config.answer_chars)
    }

    /// Record a completed exchange.
    ///
    /// The answer is stored clipped to `answer_chars` characters, then the
    /// history is trimmed to its most recent entries.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        let clipped: String = answer.chars().take(self.answer_chars).collect();
        self.history.push(HistoryTurn::user(question));
        self.history.push(HistoryTurn::assistant(clipped));

        if self.history.len() > self.max_history_turns {
            let excess = self.history.len() - self.max_history_turns;
            self.history.drain(..excess);
        }
    }

    /// Add a long-term fact.
    pub fn remember(&mut self, fact: impl Into<String>) {
        self.memory_items.push(fact.into());
    }

    pub fn record_tool_output(&mut self, output: impl Into<String>) {
        self.tool_results.push(output.into());
    }

    pub fn history(&self) -> &[HistoryTurn] {
        &self.history
    }

    pub fn memory_items(&self) -> &[String] {
        &self.memory_items
    }

    pub fn tool_results(&self) -> &[String] {
        &self.tool_results
    }

    /// Assembly input for `question` borrowing this session's state.
    pub fn input<'a>(&'a self, question: &'a str) -> ContextInput<'a> {
        ContextInput {
            question,
            history: &self.history,
            memory_items: &self.memory_items,
            retrieved_chunks: &[],
            tool_results: &self.tool_results,
        }
    }
}
