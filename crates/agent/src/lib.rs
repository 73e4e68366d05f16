//! Budgeted context assembly for a retrieval-augmented policy assistant.
//!
//! Each turn follows a fixed path:
//!
//! 1. **Retrieve** ranked chunks for the question
//! 2. **Assemble** five budgeted sections (instructions, goal, memory,
//!    retrieval, tool outputs) into one context
//! 3. **Prompt** the model with the context and the question
//! 4. **Record** the exchange in the session window
//!
//! Assembly never fails on oversized input: each section degrades under its
//! own policy and reports what it cut in the breakdown.

pub mod context;
pub mod pipeline;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use context::{
    Breakdown, ContextAssembler, ContextBundle, ContextInput, ContextRequest, RetrievalStats,
    Section, SectionResult, SectionStatus, Tokenizer, render_console, render_table,
    tokenizer_for,
};
pub use pipeline::{PolicyAssistant, TurnOutcome, build_prompt};
pub use session::Session;
