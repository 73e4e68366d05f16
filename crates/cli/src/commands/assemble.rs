//! `ctxbudget assemble` — Assemble one context from a request file.

use std::path::Path;

use clap::ValueEnum;
use ctxbudget_agent::{ContextAssembler, ContextBundle, ContextRequest, render_console, render_table};
use ctxbudget_config::AppConfig;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The assembled context text
    Text,
    /// The full bundle as JSON
    Json,
    /// Breakdown as a compact table
    Table,
    /// Breakdown as the multi-line console report
    Console,
}

pub async fn run(
    config_path: Option<&Path>,
    input: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let raw = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", input.display()))?;
    let request: ContextRequest = serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid request {}: {e}", input.display()))?;

    let assembler = ContextAssembler::from_config(&config)?;
    let bundle = assembler.assemble(&request.as_input())?;
    debug!(
        path = %input.display(),
        encoding = %config.tokenizer.encoding,
        total_tokens = bundle.total_tokens,
        overflow = bundle.overflow,
        "Request assembled"
    );

    print!("{}", render(&bundle, format)?);
    Ok(())
}

/// Render `bundle` in the requested format.
pub fn render(bundle: &ContextBundle, format: OutputFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Text => format!("{}\n", bundle.assembled_text),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(bundle)?),
        OutputFormat::Table => render_table(bundle),
        OutputFormat::Console => render_console(bundle),
    })
}
