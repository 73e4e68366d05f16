//! Error types for the ctxbudget domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. Truncation is never an
//! error: it is reported through section diagnostics instead.

use thiserror::Error;

/// The top-level error type for all ctxbudget operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Tokenizer errors (fatal for assembly) ---
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the shared tokenizer. Every budget depends on it, so these
/// are never retried.
#[derive(Debug, Clone, Error)]
pub enum TokenizerError {
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Failed to load encoding {encoding}: {reason}")]
    LoadFailed { encoding: String, reason: String },

    #[error("Failed to decode {tokens} tokens: {reason}")]
    DecodeFailed { tokens: usize, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Failed to read chunk source {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("Invalid chunk source {path}: {reason}")]
    InvalidSource { path: String, reason: String },

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tokenizer_error_converts_into_top_level() {
        let err: Error = TokenizerError::UnknownEncoding("p50k_edit".into()).into();
        assert!(matches!(err, Error::Tokenizer(_)));
        assert!(err.to_string().contains("p50k_edit"));
    }

    #[test]
    fn retrieval_error_names_the_source() {
        let err = Error::Retrieval(RetrievalError::InvalidSource {
            path: "chunks.json".into(),
            reason: "expected an array".into(),
        });
        assert!(err.to_string().contains("chunks.json"));
        assert!(err.to_string().contains("expected an array"));
    }

    #[test]
    fn bounded_errors_convert_with_question_mark() {
        fn retrieve() -> Result<()> {
            Err(RetrievalError::QueryFailed("index offline".into()))?
        }
        fn generate() -> Result<()> {
            Err(ProviderError::Timeout("30s".into()))?
        }

        assert!(matches!(retrieve(), Err(Error::Retrieval(_))));
        assert!(matches!(generate(), Err(Error::Provider(ProviderError::Timeout(_)))));
    }
}
