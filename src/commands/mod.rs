/// `vsf config`: get, set, unset and list settings
pub mod config;
/// `vsf detect`: print the project found in a directory
pub mod detect;
/// `vsf generate`: preview, approve, then write both manifests
pub mod generate;
/// `vsf preview`: print the filter tree only
pub mod preview;

use crate::RunContext;
use crate::hierarchy::GroupHierarchy;
use crate::scanner::{FileEntry, TreeScanner};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Prints a final result line with a green check mark.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Scan output and the groups derived from it.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Compiled sources and headers, sorted by path
    pub entries: Vec<FileEntry>,
    /// Groups for every directory holding an entry
    pub groups: GroupHierarchy,
}

/// Walk `root` with the configured scan settings and derive its groups.
///
/// # Errors
///
/// Returns an error if the root is invalid or cannot be listed.
pub fn discover(ctx: &RunContext, root: &Path) -> Result<Discovery> {
    let scanner = TreeScanner::from_config(root.to_path_buf(), &ctx.config.scan);
    let entries = scanner
        .scan()
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    let groups = GroupHierarchy::derive(&entries);

    crate::output::verbose(&format!(
        "Found {} files in {} groups",
        entries.len(),
        groups.len()
    ));

    Ok(Discovery { entries, groups })
}

/// Label for the preview root: the directory's own name.
#[must_use]
pub fn root_label(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

/// Manifest base name from `--project`, or the stem of the `.vcxproj` in
/// `root`.
///
/// Both manifest paths are built from the returned name, so a detected
/// project always resolves to a file that exists.
///
/// # Errors
///
/// Returns [`crate::error::FilterError::NoTargetFound`] when no usable name
/// exists.
pub fn resolve_project_name(root: &Path, explicit: Option<&str>) -> Result<String> {
    match explicit.map(str::trim) {
        Some("") => Err(crate::error::FilterError::NoTargetFound(root.to_path_buf()).into()),
        Some(name) => Ok(name.to_string()),
        None => {
            let detected = crate::project::detect_project(root)?;
            if detected.display_name != detected.base_name {
                crate::output::verbose(&format!(
                    "{} declares project name {}",
                    detected.path.display(),
                    detected.display_name
                ));
            }
            Ok(detected.base_name)
        }
    }
}
