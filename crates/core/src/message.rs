//! Conversation turn types.
//!
//! A turn is the smallest unit of dialogue the context assembler reads.
//! Callers own the history; the assembler only borrows slices of it.

use serde::{Deserialize, Serialize};

/// Role label for user turns.
pub const ROLE_USER: &str = "user";
/// Role label for assistant turns.
pub const ROLE_ASSISTANT: &str = "assistant";

/// A single turn of conversation history.
///
/// Both fields tolerate being absent in serialized input: a missing role
/// reads as `user` and missing content as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who produced this turn (`user`, `assistant`, ...).
    #[serde(default = "default_role")]
    pub role: String,

    /// The text content
    #[serde(default)]
    pub content: String,
}

fn default_role() -> String {
    ROLE_USER.into()
}

impl HistoryTurn {
    /// Create a turn with an arbitrary role label.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }
}
