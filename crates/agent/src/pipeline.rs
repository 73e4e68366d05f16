//! Policy assistant: retrieval-augmented answering over a budgeted context.
//!
//! # Flow
//!
//! 1. Query the retriever with the user question
//! 2. Assemble the context from the session state and retrieved chunks
//! 3. Wrap the assembled text into the answer prompt
//! 4. Generate the answer
//! 5. Record the exchange in the session
//!
//! The session is only updated after a successful generation, so a failed
//! turn leaves it untouched.

use std::sync::Arc;

use ctxbudget_config::AppConfig;
use ctxbudget_core::provider::{GenerationRequest, Generator};
use ctxbudget_core::retrieval::Retriever;
use tracing::{debug, info};

use crate::context::{ContextAssembler, ContextBundle, ContextInput};
use crate::session::Session;

/// Build the final model prompt from an assembled context.
pub fn build_prompt(assembled: &str, question: &str) -> String {
    format!(
        "{assembled}\n\n    ---\n\n    Question: {question}\n\n    Answer (be concise and cite relevant policies):\n    "
    )
}

/// Result of one answered turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The model's full answer (the session stores a clipped copy).
    pub answer: String,
    /// The context the answer was generated from.
    pub bundle: ContextBundle,
    /// Chunks the retriever returned, before budgeting.
    pub chunks_retrieved: usize,
}

/// Answers questions with a retriever, an assembler and a generator.
pub struct PolicyAssistant {
    assembler: ContextAssembler,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    model: String,
    temperature: f32,
}

impl PolicyAssistant {
    pub fn new(
        assembler: ContextAssembler,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            assembler,
            retriever,
            generator,
            model: model.into(),
            temperature,
        }
    }

    /// Wire up an assistant from config. Fails if the configured tokenizer
    /// cannot be loaded.
    pub fn from_config(
        config: &AppConfig,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self, ctxbudget_core::Error> {
        let assembler = ContextAssembler::from_config(config)?;
        Ok(Self::new(
            assembler,
            retriever,
            generator,
            &config.provider.model,
            config.provider.temperature,
        ))
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// Answer one question and record the exchange in `session`.
    pub async fn ask(
        &self,
        question: &str,
        session: &mut Session,
    ) -> Result<TurnOutcome, ctxbudget_core::Error> {
        info!(
            retriever = self.retriever.name(),
            generator = self.generator.name(),
            model = %self.model,
            "turn started"
        );

        let chunks = self.retriever.query(question).await?;
        debug!(chunks = chunks.len(), "chunks retrieved");

        let input = ContextInput {
            retrieved_chunks: &chunks,
            ..session.input(question)
        };
        let bundle = self.assembler.assemble(&input)?;

        if bundle.overflow {
            debug!(total_tokens = bundle.total_tokens, "context overflowed its budgets");
        }

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: build_prompt(&bundle.assembled_text, question),
            temperature: self.temperature,
        };
        let answer = self.generator.generate(request).await?;

        session.record_exchange(question, &answer);

        info!(
            chunks = chunks.len(),
            total_tokens = bundle.total_tokens,
            overflow = bundle.overflow,
            answer_len = answer.len(),
            "turn answered"
        );

        Ok(TurnOutcome {
            answer,
            bundle,
            chunks_retrieved: chunks.len(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
