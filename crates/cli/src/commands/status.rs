//! `ctxbudget status` — Show configuration status.

use std::path::Path;

use ctxbudget_config::AppConfig;

pub async fn run(
    config_path: Option<&Path>,
    print_default: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if print_default {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config =
        AppConfig::load_with(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let config_file = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("📦 ctxbudget Status");
    println!("==================");
    println!("  Config file:  {}", config_file.display());
    println!("  Tokenizer:    {}", config.tokenizer.encoding);
    println!("  Budget total: {} tokens", config.budgets.total());
    println!("  Provider:     {}", config.provider.base_url);
    println!("  Model:        {}", config.provider.model);
    println!("  Temperature:  {}", config.provider.temperature);
    println!("  API key:      {}", if config.provider.api_key.is_some() { "set" } else { "not set" });
    println!("  Retrieval:    top {} chunks", config.retrieval.top_k);
    println!(
        "  History:      {} entries, answers clipped to {} chars",
        config.session.max_history_turns, config.session.answer_chars
    );

    if config_file.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — using defaults");
        println!("      Create one with `ctxbudget status --print-default > {}`", config_file.display());
    }

    Ok(())
}
