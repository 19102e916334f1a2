/// Reading, decoding and range-checking configuration files
pub mod parser;
/// Warnings for configuration keys vsf does not recognize
pub mod validator;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// User configuration, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Tree walk settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Terminal output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Failure report settings
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Which parts of the tree are walked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Path components or prefixes never entered
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    /// Descend into symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// How results are shown on the terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// ANSI colors in status lines and diffs
    #[serde(default = "default_true")]
    pub color: bool,
    /// Show the hierarchy tree before asking for approval
    #[serde(default = "default_true")]
    pub preview: bool,
    /// Context lines in `--dry-run` diffs
    #[serde(default = "default_diff_context")]
    pub diff_context: usize,
}

/// Where failure reports are persisted in addition to stderr.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// File the last failure report is written to, replacing earlier ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_log: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            follow_symlinks: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            preview: true,
            diff_context: default_diff_context(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults and is not created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot read the configuration file
    /// - Configuration file contains invalid TOML or invalid values
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let (section, field) = key.split_once('.')?;

        match (section, field) {
            ("scan", "ignore_patterns") => Some(self.scan.ignore_patterns.join(",")),
            ("scan", "follow_symlinks") => Some(self.scan.follow_symlinks.to_string()),
            ("output", "color") => Some(self.output.color.to_string()),
            ("output", "preview") => Some(self.output.preview.to_string()),
            ("output", "diff_context") => Some(self.output.diff_context.to_string()),
            ("diagnostics", "error_log") => self
                .diagnostics
                .error_log
                .as_ref()
                .map(|p| p.display().to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// `scan.ignore_patterns` takes a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    /// - The value is invalid for the key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid configuration key: {key}"))?;

        match (section, field) {
            ("scan", "ignore_patterns") => {
                self.scan.ignore_patterns = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            ("scan", "follow_symlinks") => {
                self.scan.follow_symlinks = parse_bool(&value)?;
            }
            ("output", "color") => self.output.color = parse_bool(&value)?,
            ("output", "preview") => self.output.preview = parse_bool(&value)?,
            ("output", "diff_context") => {
                let lines: usize = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
                if lines > parser::MAX_DIFF_CONTEXT {
                    return Err(anyhow::anyhow!(
                        "Diff context must be at most {}",
                        parser::MAX_DIFF_CONTEXT
                    ));
                }
                self.output.diff_context = lines;
            }
            ("diagnostics", "error_log") => {
                if value.trim().is_empty() {
                    return Err(anyhow::anyhow!("Error log path cannot be empty"));
                }
                self.diagnostics.error_log = Some(PathBuf::from(value));
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }

    /// Unset a configuration value by key, restoring its default
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    pub fn unset(&mut self, key: &str) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid configuration key: {key}"))?;

        match (section, field) {
            ("scan", "ignore_patterns") => self.scan.ignore_patterns = default_ignore_patterns(),
            ("scan", "follow_symlinks") => self.scan.follow_symlinks = false,
            ("output", "color") => self.output.color = true,
            ("output", "preview") => self.output.preview = true,
            ("output", "diff_context") => self.output.diff_context = default_diff_context(),
            ("diagnostics", "error_log") => self.diagnostics.error_log = None,
            _ => return Err(anyhow::anyhow!("Cannot unset configuration key: {key}")),
        }
        Ok(())
    }

    /// All addressable keys with their current values, in display order
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter().map(|&key| (key, self.get(key))).collect()
    }
}

/// Every `section.key` accepted by [`Config::get`] and [`Config::set`]
pub const KEYS: &[&str] = &[
    "scan.ignore_patterns",
    "scan.follow_symlinks",
    "output.color",
    "output.preview",
    "output.diff_context",
    "diagnostics.error_log",
];

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("Invalid boolean: {value}"))
}

// Default functions for serde
fn default_ignore_patterns() -> Vec<String> {
    vec![".git".to_string(), ".vs".to_string()]
}

const fn default_true() -> bool {
    true
}

const fn default_diff_context() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_returns_defaults_without_creating() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config");

        let config = Config::load(&path).unwrap();

        assert_eq!(config, Config::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");

        let mut config = Config::default();
        config.set("scan.ignore_patterns", "x64, Debug,,".to_string()).unwrap();
        config.set("diagnostics.error_log", "/tmp/vsf.log".to_string()).unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.scan.ignore_patterns, vec!["x64", "Debug"]);
        assert_eq!(
            loaded.diagnostics.error_log,
            Some(PathBuf::from("/tmp/vsf.log"))
        );
    }

    #[test]
    fn test_get_set_unset() {
        let mut config = Config::default();
        assert_eq!(config.get("output.color").as_deref(), Some("true"));
        assert_eq!(config.get("diagnostics.error_log"), None);

        config.set("output.color", "false".to_string()).unwrap();
        assert_eq!(config.get("output.color").as_deref(), Some("false"));

        config.unset("output.color").unwrap();
        assert!(config.output.color);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("output.color", "maybe".to_string()).is_err());
        assert!(config.set("output.diff_context", "-1".to_string()).is_err());
        assert!(config.set("output.diff_context", "100000".to_string()).is_err());
        assert!(config.set("diagnostics.error_log", "  ".to_string()).is_err());
        assert!(config.set("nosection", "x".to_string()).is_err());
        assert!(config.set("scan.unknown", "x".to_string()).is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        std::fs::write(&path, "[output]\ncolor = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.output.color);
        assert!(config.output.preview);
        assert_eq!(config.scan, ScanConfig::default());
    }

    #[test]
    fn test_entries_cover_all_keys() {
        let config = Config::default();
        let entries = config.entries();
        assert_eq!(entries.len(), KEYS.len());
        assert!(entries.iter().any(|(k, v)| *k == "scan.ignore_patterns"
            && v.as_deref() == Some(".git,.vs")));
    }
}
