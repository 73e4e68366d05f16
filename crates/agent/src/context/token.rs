//! Token counting and prefix truncation.
//!
//! Every section budget is expressed in the units of one shared
//! [`Tokenizer`]. Two encodings are available:
//!
//! - `cl100k_base`: exact BPE counts via `tiktoken-rs`.
//! - `char-estimate`: ~4 bytes per token, rounded up. Accurate within ~10%
//!   for English text and fully predictable, which keeps test cases simple.
//!
//! Truncation always keeps the *prefix*: the first `max_tokens` tokens of
//! the encoded text, decoded back to a string.

use std::sync::Arc;

use ctxbudget_core::TokenizerError;
use tiktoken_rs::CoreBPE;

/// Name of the exact BPE encoding.
pub const CL100K_BASE: &str = "cl100k_base";
/// Name of the character heuristic.
pub const CHAR_ESTIMATE: &str = "char-estimate";

/// Outcome of [`Tokenizer::truncate_to_budget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// The kept prefix (or the untouched input).
    pub text: String,
    /// Token count of `text`.
    pub tokens: usize,
    /// Whether anything was cut.
    pub truncated: bool,
}

/// A fixed text encoding shared by every section builder.
///
/// Implementations are immutable after construction, so one instance can be
/// shared across threads and concurrent assemblies.
pub trait Tokenizer: Send + Sync {
    /// Encoding name, as used in configuration.
    fn name(&self) -> &str;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize;

    /// Keep the first `max_tokens` tokens of `text`.
    ///
    /// Returns the input unchanged (with `truncated = false`) when it
    /// already fits.
    fn truncate_to_budget(&self, text: &str, max_tokens: usize)
    -> Result<Truncation, TokenizerError>;
}

/// Build the tokenizer named by `encoding`.
pub fn tokenizer_for(encoding: &str) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    match encoding {
        CL100K_BASE => Ok(Arc::new(Cl100kTokenizer::new()?)),
        CHAR_ESTIMATE => Ok(Arc::new(CharEstimateTokenizer)),
        other => Err(TokenizerError::UnknownEncoding(other.to_string())),
    }
}

// ── cl100k_base ───────────────────────────────────────────────────────────

/// Exact BPE tokenizer using the `cl100k_base` encoding.
pub struct Cl100kTokenizer {
    bpe: CoreBPE,
}

impl Cl100kTokenizer {
    /// Load the encoding. Fails only if the bundled ranks cannot be parsed.
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::LoadFailed {
            encoding: CL100K_BASE.into(),
            reason: e.to_string(),
        })?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for Cl100kTokenizer {
    fn name(&self) -> &str {
        CL100K_BASE
    }

    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Keep the longest token prefix of at most `max_tokens` that decodes
    /// to whole characters. When the cut would split a multi-byte character
    /// the prefix backs off below `max_tokens` instead of emitting U+FFFD,
    /// so `tokens` in the result can be smaller than the budget.
    fn truncate_to_budget(
        &self,
        text: &str,
        max_tokens: usize,
    ) -> Result<Truncation, TokenizerError> {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return Ok(Truncation {
                text: text.to_string(),
                tokens: tokens.len(),
                truncated: false,
            });
        }

        // A token prefix can end inside a multi-byte character; drop tokens
        // from the tail until the prefix decodes.
        let mut keep = max_tokens;
        loop {
            match self.bpe.decode(tokens[..keep].to_vec()) {
                Ok(prefix) => {
                    return Ok(Truncation {
                        text: prefix,
                        tokens: keep,
                        truncated: true,
                    });
                }
                Err(e) if keep == 0 => {
                    return Err(TokenizerError::DecodeFailed {
                        tokens: keep,
                        reason: e.to_string(),
                    });
                }
                Err(_) => keep -= 1,
            }
        }
    }
}

// ── char-estimate ─────────────────────────────────────────────────────────

/// Heuristic tokenizer: 1 token ≈ 4 bytes, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimateTokenizer;

const BYTES_PER_TOKEN: usize = 4;

impl Tokenizer for CharEstimateTokenizer {
    fn name(&self) -> &str {
        CHAR_ESTIMATE
    }

    fn count(&self, text: &str) -> usize {
        text.len().div_ceil(BYTES_PER_TOKEN)
    }

    fn truncate_to_budget(
        &self,
        text: &str,
        max_tokens: usize,
    ) -> Result<Truncation, TokenizerError> {
        let tokens = self.count(text);
        if tokens <= max_tokens {
            return Ok(Truncation {
                text: text.to_string(),
                tokens,
                truncated: false,
            });
        }

        let mut end = (max_tokens * BYTES_PER_TOKEN).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let prefix = &text[..end];
        Ok(Truncation {
            text: prefix.to_string(),
            tokens: self.count(prefix),
            truncated: true,
        })
    }
}
