use super::resolve_config;
use crate::modules::discover_modules;
use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::path::Path;

/// Print the discovered modules and their validation state.
pub fn list_modules(project: &Path, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let modules = discover_modules(project, &config.scan)
        .with_context(|| format!("Failed to discover modules in {}", project.display()))?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Module", "Path", "Valid", "Problem"]);
    for module in &modules {
        let valid = if module.is_valid() { "yes".green() } else { "no".red() };
        table.add_row(vec![
            module.name.clone(),
            module.root.display().to_string(),
            valid.to_string(),
            module.validation_error.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
    println!(
        "{} modules, {} valid",
        modules.len(),
        modules.iter().filter(|m| m.is_valid()).count()
    );
    Ok(())
}
