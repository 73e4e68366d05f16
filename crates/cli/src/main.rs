//! ctxbudget CLI — the main entry point.
//!
//! Commands:
//! - `assemble` — Assemble a context from a JSON request file
//! - `budgets`  — Show the active budget table
//! - `chat`     — Interactive policy assistant over a chunk file
//! - `status`   — Show configuration status

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::assemble::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ctxbudget",
    about = "ctxbudget — budgeted context assembly for RAG assistants",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.ctxbudget/config.toml)
    #[arg(short, long, global = true, env = "CTXBUDGET_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a context from a JSON request
    Assemble {
        /// Request file: {question, history?, memory_items?, retrieved_chunks?, tool_results?}
        #[arg(short, long)]
        input: PathBuf,

        /// What to print
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the active budget table
    Budgets,

    /// Chat with the policy assistant
    Chat {
        /// Pre-ranked chunk file (JSON array of {content, source})
        #[arg(long)]
        chunks: PathBuf,
    },

    /// Show configuration status
    Status {
        /// Print a complete default config file instead
        #[arg(long)]
        print_default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Assemble { input, format } => {
            commands::assemble::run(config_path, &input, format).await?
        }
        Commands::Budgets => commands::budgets::run(config_path).await?,
        Commands::Chat { chunks } => commands::chat::run(config_path, &chunks).await?,
        Commands::Status { print_default } => {
            commands::status::run(config_path, print_default).await?
        }
    }

    Ok(())
}
