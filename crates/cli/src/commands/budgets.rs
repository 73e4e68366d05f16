//! `ctxbudget budgets` — Show the active budget table.

use std::path::Path;

use ctxbudget_agent::Section;
use ctxbudget_config::{AppConfig, BudgetTable};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    print!("{}", render(&config.budgets));
    Ok(())
}

fn render(budgets: &BudgetTable) -> String {
    let mut out = String::from("📐 Context Budgets (tokens)\n");
    out.push_str("─────────────────────────────────────\n");
    for section in Section::ALL {
        out.push_str(&format!(
            "  {:<14} {:>6}\n",
            section.title(),
            section.budget(budgets)
        ));
    }
    out.push_str(&format!("  {:<14} {:>6}\n", "─────", "─────"));
    out.push_str(&format!("  {:<14} {:>6}\n", "Total", budgets.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_section_and_total() {
        let out = render(&BudgetTable::default());
        assert!(out.contains("  Instructions      255\n"));
        assert!(out.contains("  Tool Outputs      855\n"));
        assert!(out.contains("  Total            3215\n"));
    }
}
