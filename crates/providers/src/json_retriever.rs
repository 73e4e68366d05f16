//! File-backed retriever for chunks ranked ahead of time.
//!
//! The file is a JSON array of `{content, source}` objects, already ordered
//! by an external vector store. Every query returns the same leading
//! `top_k` entries.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ctxbudget_core::error::RetrievalError;
use ctxbudget_core::retrieval::{RetrievedChunk, Retriever};
use tracing::debug;

/// Serves pre-ranked chunks loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRetriever {
    path: PathBuf,
    chunks: Vec<RetrievedChunk>,
    top_k: usize,
}

impl JsonFileRetriever {
    /// Read and parse `path`. The file is loaded once, here.
    pub fn load(path: impl AsRef<Path>, top_k: usize) -> Result<Self, RetrievalError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| RetrievalError::SourceUnavailable {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        let chunks: Vec<RetrievedChunk> =
            serde_json::from_str(&raw).map_err(|e| RetrievalError::InvalidSource {
                path: display,
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), chunks = chunks.len(), top_k, "Loaded chunk file");

        Ok(Self {
            path: path.to_path_buf(),
            chunks,
            top_k,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of chunks in the file.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[async_trait]
impl Retriever for JsonFileRetriever {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn query(&self, _question: &str) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        Ok(self.chunks.iter().take(self.top_k).cloned().collect())
    }
}
