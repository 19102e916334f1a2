//! Additive merge of discovered files into the item manifest (`.vcxproj`).
//!
//! The merge never removes or rewrites an existing line. Declarations for
//! files that no longer exist on disk are kept.
//!
//! # Safety protocol
//!
//! 1. Copy the manifest to `<stem>_backup.vcxproj` ([`BackupGuard::begin`]),
//!    refusing to start if that file is already present.
//! 2. Read, plan and render the merged document.
//! 3. Write and verify it.
//! 4. On success delete the backup; on any failure copy it back.
//!
//! After a run the manifest is either fully updated or byte-identical to its
//! pre-run content.

/// Backup guard protecting the manifest during a merge
pub mod backup;

/// Project file discovery and name inference
pub mod detect;

/// Line model of the item manifest
pub mod manifest;

pub use backup::{BackupGuard, backup_path};
pub use detect::{DetectedProject, detect_project, detect_project_name, find_project_file};
pub use manifest::{Declaration, ItemManifest, ManifestLine, MergePlan};

use crate::error::Result;
use crate::scanner::FileEntry;
use crate::utils::{read_text, write_verified};
use std::path::{Path, PathBuf};
use tracing::{Level, info, span};

/// Extension of the item manifest.
pub const PROJECT_EXTENSION: &str = ".vcxproj";

/// Path of the item manifest for `project_name` inside `project_dir`.
#[must_use]
pub fn project_path(project_dir: &Path, project_name: &str) -> PathBuf {
    project_dir.join(format!("{project_name}{PROJECT_EXTENSION}"))
}

/// Result of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Manifest that was merged into.
    pub path: PathBuf,
    /// Declarations present before the merge.
    pub existing: usize,
    /// Declarations added by the merge.
    pub added: usize,
}

impl MergeOutcome {
    /// Whether the manifest was left untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added == 0
    }
}

/// Preview of a merge, computed without touching the filesystem.
#[derive(Debug, Clone)]
pub struct PendingMerge {
    /// Manifest text as read.
    pub before: String,
    /// Manifest text after the planned additions.
    pub after: String,
    /// Planned additions.
    pub plan: MergePlan,
    /// Declarations present before the merge.
    pub existing: usize,
}

/// Reads `path` and computes what a merge of `entries` would change.
///
/// # Errors
///
/// Returns [`crate::error::FilterError::Io`] or
/// [`crate::error::FilterError::InvalidEncoding`] if the manifest cannot be
/// read.
pub fn plan_merge(path: &Path, entries: &[FileEntry]) -> Result<PendingMerge> {
    let before = read_text(path)?;
    let mut manifest = ItemManifest::parse(&before);
    let existing = manifest.declarations().count();
    let plan = manifest.plan(entries);

    let after = if plan.is_empty() {
        before.clone()
    } else {
        manifest.apply(&plan);
        manifest.render()
    };

    Ok(PendingMerge {
        before,
        after,
        plan,
        existing,
    })
}

/// Merges `entries` into the manifest at `path` under backup protection.
///
/// # Errors
///
/// Any read, encoding, write or verification failure. The manifest has been
/// restored to its original bytes when the error is returned, unless the
/// error is [`crate::error::FilterError::RestoreFailed`].
pub fn update_project_file(path: &Path, entries: &[FileEntry]) -> Result<MergeOutcome> {
    update_project_file_with(path, entries, write_verified)
}

/// [`update_project_file`] with a caller-supplied writer for the merged text.
///
/// # Errors
///
/// See [`update_project_file`]. Errors from `write` trigger a restore like
/// any other failure.
pub fn update_project_file_with<W>(
    path: &Path,
    entries: &[FileEntry],
    write: W,
) -> Result<MergeOutcome>
where
    W: FnOnce(&Path, &str) -> Result<()>,
{
    let span = span!(Level::DEBUG, "merge", path = %path.display());
    let _guard = span.enter();

    let guard = BackupGuard::begin(path)?;
    match merge_in_place(path, entries, write) {
        Ok(outcome) => {
            guard.commit()?;
            info!(
                path = %path.display(),
                existing = outcome.existing,
                added = outcome.added,
                "item manifest merged"
            );
            Ok(outcome)
        }
        Err(e) => Err(guard.restore(e)),
    }
}

/// Read-plan-write step run while the backup exists.
fn merge_in_place<W>(path: &Path, entries: &[FileEntry], write: W) -> Result<MergeOutcome>
where
    W: FnOnce(&Path, &str) -> Result<()>,
{
    let pending = plan_merge(path, entries)?;

    // No additions: leave the file byte-identical instead of rewriting it.
    if !pending.plan.is_empty() {
        write(path, &pending.after)?;
    }

    Ok(MergeOutcome {
        path: path.to_path_buf(),
        existing: pending.existing,
        added: pending.plan.len(),
    })
}
