#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::indexing_slicing)] // Arena indices are created by the arena itself

//! # vsfilters - Visual Studio filters from a source tree
//!
//! vsfilters scans a directory for C and C++ sources and headers, mirrors the
//! directory layout as a `.vcxproj.filters` group hierarchy, and adds any
//! file the `.vcxproj` does not yet declare.
//!
//! ## Pipeline
//!
//! 1. [`scanner`] walks the tree and classifies files by extension.
//! 2. [`hierarchy`] derives one group per directory, each with a fresh GUID.
//! 3. [`preview`] renders the groups as a tree for review.
//! 4. [`filters`] regenerates the filter manifest.
//! 5. [`project`] merges new declarations into the item manifest under a
//!    backup that is restored on any failure.
//!
//! The item manifest merge is additive: existing lines are never removed or
//! rewritten, and a no-op merge leaves the file byte-identical.
//!
//! ## Example Usage
//!
//! ```no_run
//! use vsfilters::approval::AutoApprove;
//! use vsfilters::commands::generate::{self, GenerateOptions};
//! use vsfilters::RunContext;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = RunContext::new()?;
//! let opts = GenerateOptions {
//!     root: "MyGame".into(),
//!     project: None,
//!     dry_run: false,
//! };
//! generate::execute(&ctx, &opts, &mut AutoApprove)?;
//! # Ok(())
//! # }
//! ```

/// Operator approval gate (terminal prompt, `--yes`, fixed answers).
pub mod approval;

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations (generate, preview, detect, config).
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Failure reports for runs that stop partway.
pub mod diagnostics;

/// Unified diff of the item manifest for dry runs.
pub mod diff;

/// Error types for the core pipeline.
pub mod error;

/// Filter manifest rendering and writing.
pub mod filters;

/// Group hierarchy derivation.
pub mod hierarchy;

/// Output formatting and verbosity.
pub mod output;

/// Tree projection of the hierarchy for review.
pub mod preview;

/// Item manifest model, merge, backup and project detection.
pub mod project;

/// Filesystem scanning and file classification.
pub mod scanner;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the vsf binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/vsfilters/config";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "VSF_CONFIG_PATH";

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "VSF_LOG";

/// Settings shared by every command.
///
/// # Examples
///
/// ```no_run
/// use vsfilters::RunContext;
///
/// # fn main() -> anyhow::Result<()> {
/// // Configuration from $VSF_CONFIG_PATH or ~/.config/vsfilters/config
/// let ctx = RunContext::new()?;
///
/// // Explicit configuration path (for tests)
/// let ctx = RunContext::new_explicit("/tmp/vsf-config".into())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl RunContext {
    /// Creates a context by loading the configuration from the default path.
    ///
    /// A missing configuration file yields defaults and is not created.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or if the
    /// configuration file exists but cannot be read or parsed.
    pub fn new() -> Result<Self> {
        // Check environment variable for config path first
        let config_path = if let Ok(path) = std::env::var(CONFIG_ENV) {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let config = config::Config::load(&config_path)?;

        // Validate configuration and warn about issues
        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&config_path) {
            output::warning(&format!("Configuration validation failed: {e}"));
        }

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Creates a context from an explicit configuration path, skipping the
    /// environment lookup and the unknown-key warnings.
    ///
    /// # Errors
    /// Returns an error if the configuration file exists but cannot be loaded.
    pub fn new_explicit(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }
}
