//! End-to-end integration tests for ctxbudget.
//!
//! These tests exercise the full path from a config file and a chunk file
//! to an answered turn, plus the section policies through the public
//! assembler API.

use std::io::Write;
use std::sync::{Arc, Mutex};

use ctxbudget_agent::context::CharEstimateTokenizer;
use ctxbudget_agent::{
    ContextAssembler, ContextInput, PolicyAssistant, Session, render_console, render_table,
};
use ctxbudget_config::{AppConfig, BudgetTable};
use ctxbudget_core::error::ProviderError;
use ctxbudget_core::provider::{GenerationRequest, Generator};
use ctxbudget_core::{HistoryTurn, RetrievedChunk};
use ctxbudget_providers::JsonFileRetriever;

// ── Mock Generator ───────────────────────────────────────────────────────

/// Returns scripted answers in sequence and keeps every prompt.
struct ScriptedGenerator {
    answers: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().rev().map(|a| a.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt);
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedGenerator: no more answers"))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn estimate_assembler() -> ContextAssembler {
    ContextAssembler::new(
        Arc::new(CharEstimateTokenizer),
        BudgetTable::default(),
        "You are a Travel & Expense Policy Assistant.",
    )
}

const CHUNKS_JSON: &str = r#"[
    {"content": "Hotel stays are reimbursed up to $250 per night in tier-1 cities.", "source": "lodging.md"},
    {"content": "Itemized receipts are required for any expense over $25.", "source": "receipts.md"},
    {"content": "Economy class is the default for flights under six hours.", "source": "air.md"},
    {"content": "Ride-share is reimbursable for business travel only.", "source": "ground.md"},
    {"content": "Alcohol is never reimbursable.", "source": "meals.md"}
]"#;

// ── Full pipeline ────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_to_answered_turns() {
    let config_file = temp_file(
        r#"
[tokenizer]
encoding = "char-estimate"

[retrieval]
top_k = 4

[session]
max_history_turns = 2
"#,
    );
    let config = AppConfig::load_from(config_file.path()).unwrap();
    let chunks_file = temp_file(CHUNKS_JSON);
    let retriever = JsonFileRetriever::load(chunks_file.path(), config.retrieval.top_k).unwrap();

    let generator = Arc::new(ScriptedGenerator::new(&[
        "Up to $250 per night [lodging.md].",
        "Yes, for business travel [ground.md].",
    ]));
    let assistant =
        PolicyAssistant::from_config(&config, Arc::new(retriever), generator.clone()).unwrap();
    let mut session = Session::from_config(&config.session);

    let first = assistant
        .ask("What is the hotel cap?", &mut session)
        .await
        .unwrap();
    assert_eq!(first.chunks_retrieved, 4);
    let stats = first.bundle.breakdown.retrieval.retrieval.unwrap();
    assert_eq!(stats.chunks_kept, 4);
    assert!(!first.bundle.assembled_text.contains("meals.md"));

    let second = assistant.ask("Is Uber covered?", &mut session).await.unwrap();
    assert_eq!(second.answer, "Yes, for business travel [ground.md].");
    assert!(
        second
            .bundle
            .breakdown
            .goal
            .content
            .contains("assistant: Up to $250 per night")
    );

    // A window of two entries holds only the latest exchange.
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[0].content, "Is Uber covered?");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].ends_with(
        "Question: Is Uber covered?\n\n    Answer (be concise and cite relevant policies):\n    "
    ));

    let report = render_console(&second.bundle);
    assert!(report.contains("GOAL: "));
    assert!(report.contains(&format!("TOTAL CONTEXT: {} tokens", second.bundle.total_tokens)));
}

// ── Section policies ─────────────────────────────────────────────────────

#[test]
fn e2e_empty_memory_uses_placeholder() {
    let bundle = estimate_assembler()
        .assemble(&ContextInput::new("Hotel cap?"))
        .unwrap();
    let memory = &bundle.breakdown.memory;
    assert_eq!(memory.content, "No prior conversation context.");
    assert!(!memory.truncated);
}

#[test]
fn e2e_empty_retrieval_charges_fixed_cost() {
    let bundle = estimate_assembler()
        .assemble(&ContextInput::new("Hotel cap?"))
        .unwrap();
    let retrieval = &bundle.breakdown.retrieval;
    let stats = retrieval.retrieval.unwrap();
    assert_eq!(retrieval.content, "No relevant policy documents found.");
    assert_eq!(retrieval.tokens_used, 7);
    assert_eq!((stats.chunks_kept, stats.chunks_dropped), (0, 0));
}

#[test]
fn e2e_many_small_chunks_overflow_retrieval() {
    // Each entry: 18-19 byte label + 290 bytes + blank line → 78 tokens.
    let chunks: Vec<_> = (0..10)
        .map(|_| RetrievedChunk::new("a".repeat(290), "p.txt"))
        .collect();
    let input = ContextInput {
        retrieved_chunks: &chunks,
        ..ContextInput::new("What receipts do I need?")
    };

    let bundle = estimate_assembler().assemble(&input).unwrap();
    let retrieval = &bundle.breakdown.retrieval;
    let stats = retrieval.retrieval.unwrap();

    // Header 9 + 6 × 78 = 477; a seventh would reach 555 with 73 left.
    assert_eq!(stats.chunks_kept, 6);
    assert_eq!(stats.chunks_dropped, 4);
    assert_eq!(retrieval.tokens_used, 477);
    assert!(retrieval.truncated);
    assert!(bundle.overflow);
    assert!(render_table(&bundle).contains("Kept 6 chunks, dropped 4 chunks"));
}

#[test]
fn e2e_short_history_is_kept_whole() {
    let history: Vec<_> = (0..5)
        .map(|i| {
            if i % 2 == 0 {
                HistoryTurn::user(format!("question {i}"))
            } else {
                HistoryTurn::assistant(format!("answer {i}"))
            }
        })
        .collect();
    let input = ContextInput {
        history: &history,
        ..ContextInput::new("And for Tokyo?")
    };

    let bundle = estimate_assembler().assemble(&input).unwrap();
    let goal = &bundle.breakdown.goal;
    assert!(!goal.truncated);
    assert_eq!(
        goal.content,
        "Current Question: And for Tokyo?\n\nRecent Conversation:\n\
         user: question 2\nassistant: answer 3\nuser: question 4\n"
    );
}

#[test]
fn e2e_long_tool_outputs_keep_join_prefix() {
    let tools: Vec<_> = ["x", "y", "z"].iter().map(|c| c.repeat(1500)).collect();
    let input = ContextInput {
        tool_results: &tools,
        ..ContextInput::new("Convert my receipts")
    };

    let bundle = estimate_assembler().assemble(&input).unwrap();
    let section = &bundle.breakdown.tool_outputs;
    let joined = tools.join("\n\n");

    assert!(section.truncated);
    assert_eq!(section.tokens_used, 855);
    assert_eq!(section.content, joined[..855 * 4]);
    // The oldest entry survives whole; the newest is cut.
    assert!(section.content.starts_with(&"x".repeat(1500)));
    assert!(!section.content.ends_with(&"z".repeat(1500)));
}
