//! Source tree walk.
//!
//! The walk is best-effort: a subdirectory that cannot be read is logged and
//! skipped, and the rest of the tree is still listed. Only an invalid or
//! unreadable root fails the scan.

use super::{FileEntry, FileRole};
use crate::config::ScanConfig;
use crate::error::{FilterError, IoOp, Result};
use crate::utils::{paths, should_ignore};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};
use walkdir::WalkDir;

/// Scanner collecting compiled sources and headers under a root directory.
pub struct TreeScanner {
    /// Directory being scanned
    root: PathBuf,
    /// Patterns to ignore during scanning, matched against relative paths
    ignore_patterns: Vec<String>,
    /// Whether to follow symbolic links
    follow_symlinks: bool,
}

impl TreeScanner {
    /// Create a new tree scanner
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan
    /// * `ignore_patterns` - Patterns to exclude (e.g., ".git", "*.tmp")
    /// * `follow_symlinks` - Whether to follow symbolic links
    #[must_use]
    pub const fn new(root: PathBuf, ignore_patterns: Vec<String>, follow_symlinks: bool) -> Self {
        Self {
            root,
            ignore_patterns,
            follow_symlinks,
        }
    }

    /// Create a scanner using the `[scan]` configuration section.
    #[must_use]
    pub fn from_config(root: PathBuf, config: &ScanConfig) -> Self {
        Self::new(root, config.ignore_patterns.clone(), config.follow_symlinks)
    }

    /// Root directory of this scanner.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and return every compiled source and header, sorted by
    /// relative path.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRoot`] if the root does not exist or is
    /// not a directory, and [`FilterError::Io`] if the root itself cannot be
    /// listed.
    pub fn scan(&self) -> Result<Vec<FileEntry>> {
        let span = span!(Level::DEBUG, "tree_scan", root = %self.root.display());
        let _guard = span.enter();

        validate_root(&self.root)?;

        let mut entries = Vec::new();
        let mut skipped = 0usize;

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_skip_entry(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    skipped += 1;
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = paths::relative_canonical(entry.path(), &self.root) else {
                continue;
            };

            let role = FileRole::classify(&relative);
            if !role.is_buildable() {
                continue;
            }

            entries.push(FileEntry::with_role(&relative, role));
        }

        entries.sort();
        entries.dedup();

        debug!(files = entries.len(), skipped, "tree scan complete");
        Ok(entries)
    }

    /// Check if a path below the root should be skipped
    fn should_skip_entry(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        should_ignore(relative, &self.ignore_patterns)
    }
}

/// Checks that `root` exists, is a directory and can be listed.
///
/// # Errors
///
/// Returns [`FilterError::InvalidRoot`] or [`FilterError::Io`].
pub fn validate_root(root: &Path) -> Result<()> {
    let metadata = match std::fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FilterError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "path does not exist",
            });
        }
        Err(e) => return Err(FilterError::io(IoOp::ReadDir, root, e)),
    };

    if !metadata.is_dir() {
        return Err(FilterError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "not a directory",
        });
    }

    std::fs::read_dir(root).map_err(|e| FilterError::io(IoOp::ReadDir, root, e))?;
    Ok(())
}
