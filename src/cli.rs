//! Command-line interface definitions for vsf.
//!
//! The CLI definitions are shared between the main binary and the xtask
//! crate, which renders man pages from them.
//!
//! Field-level documentation is provided via clap attributes, so missing_docs
//! is allowed for this module.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for vsf.
#[derive(Parser)]
#[command(
    name = "vsf",
    version = crate::VERSION,
    about = "Generate Visual Studio filters from a source tree",
    long_about = "Scans a directory for C/C++ sources and headers, writes a .vcxproj.filters \
                  file mirroring the directory layout, and adds missing files to the .vcxproj"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Preview, then write the filters file and update the project file
    Generate {
        /// Directory containing the sources and the .vcxproj
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Project name (defaults to the name found in the .vcxproj)
        #[arg(short, long)]
        project: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Show the tree and the project file diff without writing anything
        #[arg(long, conflicts_with = "yes")]
        dry_run: bool,
    },

    /// Show the filter tree for a directory
    Preview {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Print the project name inferred from the .vcxproj in a directory
    Detect {
        /// Directory containing the .vcxproj
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Get and set configuration options
    Config {
        /// Configuration key (section.key)
        key: Option<String>,

        /// Configuration value to set
        value: Option<String>,

        /// Unset the configuration key
        #[arg(long)]
        unset: bool,

        /// List all configuration values
        #[arg(short, long)]
        list: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
