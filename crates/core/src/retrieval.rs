//! Retrieved reference material and the retriever seam.
//!
//! Ranking happens entirely outside this workspace. A retriever hands back
//! chunks already ordered by descending relevance, and nothing downstream
//! reorders them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// Label used when a chunk carries no source.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One retrieved passage and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The passage text.
    #[serde(default)]
    pub content: String,
    /// Human-readable source label (filename, URL, etc.).
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    UNKNOWN_SOURCE.into()
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// Anything that can answer a question with ranked chunks.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// A human-readable name for this retriever.
    fn name(&self) -> &str;

    /// Return chunks relevant to `question`, most relevant first.
    async fn query(&self, question: &str) -> Result<Vec<RetrievedChunk>, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_reads_as_unknown() {
        let chunk: RetrievedChunk =
            serde_json::from_str(r#"{"content": "Meals are capped at $75 per day."}"#).unwrap();
        assert_eq!(chunk.source, "unknown");
    }
}
