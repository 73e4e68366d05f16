//! Budgeted context assembly.
//!
//! Assembles one prompt context from five sections, each capped by its own
//! token budget and degraded by its own policy when the natural content
//! does not fit.
//!
//! # Sections (in assembly order)
//!
//! | Section | Source | Default budget |
//! |---------|--------|----------------|
//! | Instructions | Operator system prompt | 255 |
//! | Goal | Question + recent turns | 1500 |
//! | Memory | Long-term facts | 55 |
//! | Retrieval | Ranked chunks | 550 |
//! | Tool outputs | Recent tool results | 855 |

pub mod assembler;
pub mod builders;
pub mod report;
pub mod section;
pub mod token;

pub use assembler::{Breakdown, ContextAssembler, ContextBundle, ContextInput, ContextRequest};
pub use report::{SectionStatus, render_console, render_table};
pub use section::{RetrievalStats, Section, SectionResult};
pub use token::{CharEstimateTokenizer, Cl100kTokenizer, Tokenizer, Truncation, tokenizer_for};
