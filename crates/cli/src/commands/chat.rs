//! `ctxbudget chat` — Interactive policy assistant.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use ctxbudget_agent::{PolicyAssistant, Session, render_console};
use ctxbudget_config::AppConfig;
use ctxbudget_providers::{JsonFileRetriever, OpenAiCompatGenerator};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Quit,
    Skip,
    Remember(&'a str),
    Tool(&'a str),
    Ask(&'a str),
}

impl<'a> ChatCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Skip;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Self::Quit;
        }
        if let Some(fact) = line.strip_prefix("/remember ") {
            return Self::Remember(fact.trim());
        }
        if let Some(output) = line.strip_prefix("/tool ") {
            return Self::Tool(output.trim());
        }
        Self::Ask(line)
    }
}

pub async fn run(
    config_path: Option<&Path>,
    chunks: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let retriever = JsonFileRetriever::load(chunks, config.retrieval.top_k)?;
    let generator = OpenAiCompatGenerator::from_config(&config.provider)?;
    let chunk_count = retriever.len();
    let assistant = PolicyAssistant::from_config(&config, Arc::new(retriever), Arc::new(generator))?;
    let mut session = Session::from_config(&config.session);

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      ctxbudget Assistant — Interactive Mode   ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", config.provider.model);
    println!("  Endpoint:  {}", config.provider.base_url);
    println!("  Chunks:    {} loaded from {}", chunk_count, chunks.display());
    println!("  Budget:    {} tokens across 5 sections", config.budgets.total());
    println!();
    println!("  /remember <fact>  add a memory item");
    println!("  /tool <text>      record a tool output");
    println!("  Type 'exit' or 'quit' to leave.");

    let rule = "=".repeat(70);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n{}", "-".repeat(70));
        print!("\n📝 Your question: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Skip => continue,
            ChatCommand::Quit => break,
            ChatCommand::Remember(fact) => {
                session.remember(fact);
                println!("   ✓ Remembered ({} items)", session.memory_items().len());
            }
            ChatCommand::Tool(output) => {
                session.record_tool_output(output);
                println!("   ✓ Tool output recorded ({} total)", session.tool_results().len());
            }
            ChatCommand::Ask(question) => match assistant.ask(question, &mut session).await {
                Ok(outcome) => {
                    println!("\n{rule}");
                    println!("   ✓ Retrieved {} relevant chunks", outcome.chunks_retrieved);
                    print!("{}", render_console(&outcome.bundle));
                    println!("\n{rule}");
                    println!("💡 ANSWER");
                    println!("{rule}");
                    println!("{}", outcome.answer);
                    println!("{rule}");
                }
                Err(e) => eprintln!("  [Error] {e}"),
            },
        }
    }

    println!("\n👋 Goodbye!\n");
    Ok(())
}
