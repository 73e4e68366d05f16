//! Collaborator implementations for ctxbudget.
//!
//! - [`OpenAiCompatGenerator`] implements `ctxbudget_core::Generator` over
//!   any OpenAI-compatible endpoint (Ollama by default).
//! - [`JsonFileRetriever`] implements `ctxbudget_core::Retriever` over a
//!   file of chunks ranked ahead of time.

pub mod json_retriever;
pub mod openai_compat;

pub use json_retriever::JsonFileRetriever;
pub use openai_compat::OpenAiCompatGenerator;
