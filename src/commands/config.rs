use crate::RunContext;
use crate::output;
use anyhow::Result;
use colored::Colorize;

/// Execute config command to get/set configuration values
///
/// # Errors
///
/// Returns an error if:
/// - Failed to set or unset configuration value
/// - Failed to save configuration
pub fn execute(
    ctx: &mut RunContext,
    key: Option<&str>,
    value: Option<String>,
    unset: bool,
    list: bool,
) -> Result<()> {
    // If --list flag is set or no key is provided, show all configuration
    let Some(key) = key.filter(|_| !list) else {
        show_all_config(ctx);
        return Ok(());
    };

    if unset {
        ctx.config.unset(key)?;
        ctx.config.save(&ctx.config_path)?;
        output::success(&format!("Unset {key}"));
    } else if let Some(val) = value {
        ctx.config.set(key, val.clone())?;
        ctx.config.save(&ctx.config_path)?;
        output::success(&format!("Set {key} = {val}"));
    } else if let Some(val) = ctx.config.get(key) {
        println!("{val}");
    } else if crate::config::KEYS.contains(&key) {
        output::warning(&format!("Configuration key '{key}' is not set"));
    } else {
        return Err(anyhow::anyhow!("Unknown configuration key: {key}"));
    }

    Ok(())
}

/// Show all configuration values grouped by section
fn show_all_config(ctx: &RunContext) {
    let mut current_section = "";
    for (key, value) in ctx.config.entries() {
        let (section, field) = key.split_once('.').unwrap_or(("", key));
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("{}", format!("[{section}]").bold());
            current_section = section;
        }
        if let Some(value) = value {
            println!("  {field} = {value}");
        }
    }
}
