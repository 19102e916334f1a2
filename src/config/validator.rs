use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Flags configuration keys that vsf does not recognize
pub struct ConfigValidator {
    /// Every accepted `section.key`
    known_fields: HashSet<&'static str>,
    /// Accepted section names
    known_sections: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a validator for the keys listed in [`super::KEYS`]
    #[must_use]
    pub fn new() -> Self {
        let known_fields: HashSet<&'static str> = super::KEYS.iter().copied().collect();
        let known_sections = known_fields
            .iter()
            .filter_map(|key| key.split_once('.').map(|(section, _)| section))
            .collect();

        Self {
            known_fields,
            known_sections,
        }
    }

    /// Collect unknown keys from a configuration file
    ///
    /// A missing file has no unknown keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn unknown_fields(&self, config_path: &Path) -> Result<Vec<String>> {
        if !config_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(config_path)?;
        let parsed: toml::Table = toml::from_str(&content)?;

        let mut unknown = Vec::new();
        for (section, value) in &parsed {
            if !self.known_sections.contains(section.as_str()) {
                unknown.push(section.clone());
                continue;
            }
            match value {
                toml::Value::Table(fields) => {
                    for key in fields.keys() {
                        let full_key = format!("{section}.{key}");
                        if !self.known_fields.contains(full_key.as_str()) {
                            unknown.push(full_key);
                        }
                    }
                }
                _ => unknown.push(section.clone()),
            }
        }
        unknown.sort();
        Ok(unknown)
    }

    /// Validate a configuration file and print a warning per unknown key
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        let unknown = self.unknown_fields(config_path)?;
        if unknown.is_empty() {
            return Ok(());
        }

        eprintln!("{}", "Configuration warnings:".yellow().bold());
        for field in &unknown {
            eprintln!("  Unknown configuration field: {}", field.yellow());
        }
        eprintln!();
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_fields_detected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        std::fs::write(
            &path,
            "stray = 1\n\n[scan]\nfollow_symlinks = true\nmax_depth = 3\n\n[core]\nrepo_path = \"x\"\n",
        )
        .unwrap();

        let unknown = ConfigValidator::new().unknown_fields(&path).unwrap();
        assert_eq!(unknown, vec!["core", "scan.max_depth", "stray"]);
    }

    #[test]
    fn test_known_fields_pass() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        std::fs::write(
            &path,
            "[output]\ncolor = false\n\n[diagnostics]\nerror_log = \"log.txt\"\n",
        )
        .unwrap();

        assert!(ConfigValidator::new().unknown_fields(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_clean() {
        let temp = TempDir::new().unwrap();
        let validator = ConfigValidator::default();
        assert!(validator
            .unknown_fields(&temp.path().join("absent"))
            .unwrap()
            .is_empty());
    }
}
