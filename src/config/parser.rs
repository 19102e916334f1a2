use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Upper bound for `output.diff_context`
pub const MAX_DIFF_CONTEXT: usize = 1000;

/// Read, decode and validate a configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, is not valid
/// TOML, or holds out-of-range values.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let content = simdutf8::basic::from_utf8(&bytes)
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in config file: {e}"))?;

    parse_config_str(content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse configuration text and validate its values
///
/// # Errors
///
/// Returns an error on invalid TOML or out-of-range values.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.output.diff_context > MAX_DIFF_CONTEXT {
        anyhow::bail!("Diff context must be at most {MAX_DIFF_CONTEXT}");
    }

    if config.scan.ignore_patterns.iter().any(|p| p.trim().is_empty()) {
        anyhow::bail!("Ignore patterns cannot be empty");
    }

    if config
        .diagnostics
        .error_log
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        anyhow::bail!("Error log path cannot be empty");
    }

    Ok(())
}
