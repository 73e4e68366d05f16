//! # ctxbudget Core
//!
//! Domain types, collaborator traits, and error definitions for ctxbudget.
//! Nothing here does I/O; the other crates implement against these types.
//!
//! The two external collaborators, retrieval and generation, are traits here.
//! Implementations live in `ctxbudget-providers`, so the assembler and the
//! turn pipeline can be tested against in-memory stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RetrievalError, TokenizerError};
pub use message::HistoryTurn;
pub use provider::{GenerationRequest, Generator};
pub use retrieval::{RetrievedChunk, Retriever};
