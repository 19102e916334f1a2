//! Failure reports for runs that stopped after the approval gate.
//!
//! A report captures enough state to diagnose a failure without re-running:
//! the paths involved, the full error chain, what the filter manifest looks
//! like now, and whether a backup was left behind.

use crate::error::FilterError;
use crate::filters::filters_path;
use crate::project::{backup_path, project_path};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Lines of the filter manifest included in a report.
pub const FILTERS_PREVIEW_LINES: usize = 20;

/// State of the filter manifest at report time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiltersState {
    /// No file at the expected path.
    Missing,
    /// File exists; holds its leading lines.
    Present {
        /// Whether the file is read-only.
        readonly: bool,
        /// Up to [`FILTERS_PREVIEW_LINES`] lines.
        head: Vec<String>,
    },
    /// File exists but could not be read.
    Unreadable(String),
}

/// Diagnostic snapshot of a failed run.
#[derive(Debug, Clone)]
pub struct FailureReport {
    /// When the report was captured.
    pub timestamp: DateTime<Local>,
    /// Step that failed, e.g. `merge item manifest`.
    pub operation: String,
    /// Failure kind label when the cause is a [`FilterError`].
    pub kind: Option<&'static str>,
    /// Error messages from outermost to root cause.
    pub error_chain: Vec<String>,
    /// Directory that was scanned.
    pub project_dir: PathBuf,
    /// Target name, if it had been resolved.
    pub project_name: Option<String>,
    /// Expected filter manifest path.
    pub filters_path: Option<PathBuf>,
    /// Expected item manifest path.
    pub project_path: Option<PathBuf>,
    /// Filter manifest state.
    pub filters: FiltersState,
    /// Backup that survived the run, meaning a restore did not complete.
    pub leftover_backup: Option<PathBuf>,
    /// Files discovered by the scan.
    pub files: usize,
    /// Groups derived from them.
    pub groups: usize,
    /// Working directory of the process.
    pub current_dir: Option<PathBuf>,
    /// Process id.
    pub pid: u32,
}

impl FailureReport {
    /// Captures a report for `error` raised while performing `operation`.
    ///
    /// `project_name` is `None` when the failure happened before the target
    /// was resolved; the manifest paths are then unknown.
    #[must_use]
    pub fn capture(
        operation: &str,
        project_dir: &Path,
        project_name: Option<&str>,
        error: &anyhow::Error,
    ) -> Self {
        let filters_file = project_name.map(|name| filters_path(project_dir, name));
        let project_file = project_name.map(|name| project_path(project_dir, name));

        let filters = filters_file
            .as_deref()
            .map_or(FiltersState::Missing, inspect_filters);
        let leftover_backup = project_file
            .as_deref()
            .map(backup_path)
            .filter(|backup| backup.exists());

        Self {
            timestamp: Local::now(),
            operation: operation.to_string(),
            kind: error
                .chain()
                .find_map(|cause| cause.downcast_ref::<FilterError>())
                .map(FilterError::kind),
            error_chain: error.chain().map(ToString::to_string).collect(),
            project_dir: project_dir.to_path_buf(),
            project_name: project_name.map(String::from),
            filters_path: filters_file,
            project_path: project_file,
            filters,
            leftover_backup,
            files: 0,
            groups: 0,
            current_dir: std::env::current_dir().ok(),
            pid: std::process::id(),
        }
    }

    /// Records how far the pipeline got.
    #[must_use]
    pub fn with_counts(mut self, files: usize, groups: usize) -> Self {
        self.files = files;
        self.groups = groups;
        self
    }

    /// Whether the item manifest may still differ from its pre-run content.
    #[must_use]
    pub const fn is_unrecovered(&self) -> bool {
        self.leftover_backup.is_some()
    }

    /// Renders the report as plain text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Operation: {}", self.operation);
        if let Some(kind) = self.kind {
            let _ = writeln!(out, "Kind: {kind}");
        }
        for (depth, message) in self.error_chain.iter().enumerate() {
            if depth == 0 {
                let _ = writeln!(out, "Error: {message}");
            } else {
                let _ = writeln!(out, "  caused by: {message}");
            }
        }

        match &self.filters {
            FiltersState::Missing => out.push_str("Filters file does not exist.\n"),
            FiltersState::Unreadable(reason) => {
                let _ = writeln!(out, "Unable to read filters file: {reason}");
            }
            FiltersState::Present { readonly, head } => {
                let _ = writeln!(out, "Filters file read-only: {readonly}");
                let _ = writeln!(
                    out,
                    "Filters file contents (first {FILTERS_PREVIEW_LINES} lines):"
                );
                for line in head {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }

        if let Some(backup) = &self.leftover_backup {
            let _ = writeln!(
                out,
                "UNRECOVERED: backup left at {}; the project file may be incomplete",
                backup.display()
            );
        }

        let _ = writeln!(out, "Project Directory: {}", self.project_dir.display());
        if let Some(name) = &self.project_name {
            let _ = writeln!(out, "Project Name: {name}");
        }
        if let Some(path) = &self.filters_path {
            let _ = writeln!(out, "Filters Path: {}", path.display());
        }
        if let Some(path) = &self.project_path {
            let _ = writeln!(out, "Project Path: {}", path.display());
        }
        let _ = writeln!(out, "Files Processed: {}", self.files);
        let _ = writeln!(out, "Groups Derived: {}", self.groups);
        if let Some(cwd) = &self.current_dir {
            let _ = writeln!(out, "Current Directory: {}", cwd.display());
        }
        let _ = writeln!(out, "Process ID: {}", self.pid);
        out
    }

    /// Writes the report to `path`, replacing any previous report.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_log(&self, path: &Path) -> Result<()> {
        let contents = format!(
            "Error occurred at {}:\n{}",
            self.timestamp.to_rfc3339(),
            self.render()
        );
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write error log: {}", path.display()))
    }

    /// Prints the report to stderr and persists it to `error_log` if set.
    pub fn emit(&self, error_log: Option<&Path>) {
        if self.is_unrecovered() {
            crate::output::error("The project file could not be restored.");
        }
        crate::output::warning("Failure report:");
        eprint!("{}", self.render());

        if let Some(path) = error_log {
            match self.write_log(path) {
                Ok(()) => crate::output::info(&format!("Report written to {}", path.display())),
                Err(e) => crate::output::warning(&format!("{e:#}")),
            }
        }
    }
}

/// Reads the leading lines of the filter manifest at `path`.
fn inspect_filters(path: &Path) -> FiltersState {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FiltersState::Missing,
        Err(e) => return FiltersState::Unreadable(e.to_string()),
    };

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => return FiltersState::Unreadable(e.to_string()),
    };

    let mut head = Vec::new();
    for line in BufReader::new(file).lines().take(FILTERS_PREVIEW_LINES) {
        match line {
            Ok(line) => head.push(line),
            Err(e) => return FiltersState::Unreadable(e.to_string()),
        }
    }

    FiltersState::Present {
        readonly: metadata.permissions().readonly(),
        head,
    }
}
