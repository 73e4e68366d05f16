//! Shared test doubles for pipeline tests.

use std::sync::Mutex;

use ctxbudget_core::error::{ProviderError, RetrievalError};
use ctxbudget_core::provider::{GenerationRequest, Generator};
use ctxbudget_core::retrieval::{RetrievedChunk, Retriever};

/// A generator that returns scripted answers in order and records every
/// prompt it was given.
///
/// Panics if more calls are made than answers provided.
pub struct ScriptedGenerator {
    answers: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().rev().map(|a| a.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt);
        let answer = self.answers.lock().unwrap().pop();
        Ok(answer.expect("ScriptedGenerator: no more answers"))
    }
}

/// A generator that always fails.
pub struct FailingGenerator;

#[async_trait::async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Timeout("simulated".into()))
    }
}

/// A retriever that returns the same chunks for every question.
pub struct StaticRetriever {
    chunks: Vec<RetrievedChunk>,
}

impl StaticRetriever {
    pub fn new(chunks: Vec<RetrievedChunk>) -> Self {
        Self { chunks }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn query(&self, _question: &str) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        Ok(self.chunks.clone())
    }
}

/// A retriever whose store is unreachable.
pub struct FailingRetriever;

#[async_trait::async_trait]
impl Retriever for FailingRetriever {
    fn name(&self) -> &str {
        "failing"
    }

    async fn query(&self, _question: &str) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        Err(RetrievalError::QueryFailed("index offline".into()))
    }
}
