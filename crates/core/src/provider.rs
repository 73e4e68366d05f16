//! Generator trait — the abstraction over language-model backends.
//!
//! A generator takes a fully assembled prompt and returns the model's
//! completion. The context assembler never calls it; the turn pipeline does.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Sampling parameters for a single generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "llama3.2:1b")
    pub model: String,

    /// The complete prompt text
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.1
}

/// The core Generator trait.
///
/// Every model backend implements this. The pipeline calls `generate()`
/// without knowing which backend is behind it.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this backend (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a prompt and get the complete response text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}
