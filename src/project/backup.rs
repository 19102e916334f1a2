//! RAII backup guard for the item manifest.
//!
//! A copy of the manifest is taken at [`BackupGuard::begin`]. The guard must
//! be settled with [`BackupGuard::commit`] (keep the new content, delete the
//! copy) or [`BackupGuard::restore`] (copy the original back). A guard that
//! is dropped unsettled, for example on a panic between the two, restores
//! the original on its way out.
//!
//! The backup file existing after a run means a restore failed and the
//! original content is only recoverable from that copy. Later runs refuse to
//! start until it has been dealt with.

use crate::error::{FilterError, IoOp, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sibling backup location: `<stem>_backup.vcxproj`.
#[must_use]
pub fn backup_path(project: &Path) -> PathBuf {
    let stem = project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    project.with_file_name(format!("{stem}_backup.vcxproj"))
}

/// Backup of one manifest, restored on drop unless committed.
#[derive(Debug)]
pub struct BackupGuard {
    /// File being protected.
    original: PathBuf,
    /// Byte-for-byte copy taken at `begin`.
    backup: PathBuf,
    /// Set once committed or restored.
    settled: bool,
}

impl BackupGuard {
    /// Copies `original` to its backup location.
    ///
    /// The backup is created exclusively: an existing backup is never
    /// overwritten, since after a failed restore it holds the only intact
    /// copy of the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::BackupExists`] if a backup is already present,
    /// and [`FilterError::Io`] with [`IoOp::Copy`] if the copy fails. The
    /// original is untouched in both cases.
    pub fn begin(original: &Path) -> Result<Self> {
        let backup = backup_path(original);

        let mut source =
            File::open(original).map_err(|e| FilterError::io(IoOp::Copy, original, e))?;
        let mut target = match OpenOptions::new().write(true).create_new(true).open(&backup) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FilterError::BackupExists {
                    path: original.to_path_buf(),
                    backup,
                });
            }
            Err(e) => return Err(FilterError::io(IoOp::Copy, &backup, e)),
        };

        if let Err(e) = io::copy(&mut source, &mut target).and_then(|_| target.sync_all()) {
            drop(target);
            // Only our own partial copy is removed.
            let _ = std::fs::remove_file(&backup);
            return Err(FilterError::io(IoOp::Copy, original, e));
        }

        debug!(
            original = %original.display(),
            backup = %backup.display(),
            "backup created"
        );

        Ok(Self {
            original: original.to_path_buf(),
            backup,
            settled: false,
        })
    }

    /// Path of the protected file.
    #[must_use]
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Path of the backup copy.
    #[must_use]
    pub fn backup(&self) -> &Path {
        &self.backup
    }

    /// Keeps the current content and deletes the backup.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Io`] with [`IoOp::Remove`] if the backup cannot
    /// be deleted. The manifest itself is already updated at that point.
    pub fn commit(mut self) -> Result<()> {
        self.settled = true;
        std::fs::remove_file(&self.backup)
            .map_err(|e| FilterError::io(IoOp::Remove, &self.backup, e))
    }

    /// Copies the backup over the original, deletes the backup, and hands
    /// `cause` back to the caller.
    ///
    /// If the copy fails, [`FilterError::RestoreFailed`] wrapping `cause` is
    /// returned instead and the backup is left on disk.
    #[must_use]
    pub fn restore(mut self, cause: FilterError) -> FilterError {
        self.settled = true;
        warn!(
            path = %self.original.display(),
            error = %cause,
            "restoring manifest from backup"
        );

        match self.copy_back() {
            Ok(()) => cause,
            Err(source) => FilterError::RestoreFailed {
                path: self.original.clone(),
                backup: self.backup.clone(),
                cause: Box::new(cause),
                source,
            },
        }
    }

    /// Restores the original content and removes the backup.
    ///
    /// A leftover backup after a successful copy is only logged; the original
    /// already holds the right bytes.
    fn copy_back(&self) -> io::Result<()> {
        std::fs::copy(&self.backup, &self.original)?;
        if let Err(e) = std::fs::remove_file(&self.backup) {
            warn!(backup = %self.backup.display(), error = %e, "could not remove backup");
        }
        Ok(())
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(path = %self.original.display(), "backup not settled, restoring original");
        if let Err(e) = self.copy_back() {
            crate::output::error(&format!(
                "Failed to restore {} (original kept at {}): {e}",
                self.original.display(),
                self.backup.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("Demo.vcxproj");
        std::fs::write(&project, b"original").unwrap();
        (temp, project)
    }

    #[test]
    fn test_backup_path_naming() {
        assert_eq!(
            backup_path(Path::new("/x/Demo.vcxproj")),
            PathBuf::from("/x/Demo_backup.vcxproj")
        );
    }

    #[test]
    fn test_commit_removes_backup_and_keeps_changes() {
        let (_temp, project) = setup();

        let guard = BackupGuard::begin(&project).unwrap();
        let backup = guard.backup().to_path_buf();
        assert!(backup.exists());
        assert_eq!(std::fs::read(&backup).unwrap(), b"original");

        std::fs::write(&project, b"updated").unwrap();
        guard.commit().unwrap();

        assert!(!backup.exists());
        assert_eq!(std::fs::read(&project).unwrap(), b"updated");
    }

    #[test]
    fn test_restore_returns_cause_and_restores_bytes() {
        let (_temp, project) = setup();

        let guard = BackupGuard::begin(&project).unwrap();
        let backup = guard.backup().to_path_buf();
        std::fs::write(&project, b"half-writ").unwrap();

        let err = guard.restore(FilterError::IncompleteWrite(project.clone()));

        assert!(matches!(err, FilterError::IncompleteWrite(_)));
        assert_eq!(std::fs::read(&project).unwrap(), b"original");
        assert!(!backup.exists());
    }

    #[test]
    fn test_restore_failure_keeps_backup() {
        let (_temp, project) = setup();

        let guard = BackupGuard::begin(&project).unwrap();
        let backup = guard.backup().to_path_buf();
        // Replacing the target with a directory makes the copy back fail.
        std::fs::remove_file(&project).unwrap();
        std::fs::create_dir(&project).unwrap();

        let err = guard.restore(FilterError::IncompleteWrite(project.clone()));

        match err {
            FilterError::RestoreFailed { cause, backup: b, .. } => {
                assert!(matches!(*cause, FilterError::IncompleteWrite(_)));
                assert_eq!(b, backup);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read(&backup).unwrap(), b"original");
    }

    #[test]
    fn test_drop_without_settling_restores() {
        let (_temp, project) = setup();
        let backup;

        {
            let guard = BackupGuard::begin(&project).unwrap();
            backup = guard.backup().to_path_buf();
            std::fs::write(&project, b"modified").unwrap();
        }

        assert_eq!(std::fs::read(&project).unwrap(), b"original");
        assert!(!backup.exists());
    }

    #[test]
    fn test_begin_refuses_leftover_backup() {
        let (_temp, project) = setup();
        let backup = backup_path(&project);
        std::fs::write(&backup, b"last good copy").unwrap();
        std::fs::write(&project, b"half-wri").unwrap();

        let err = BackupGuard::begin(&project).unwrap_err();

        match err {
            FilterError::BackupExists { path, backup: b } => {
                assert_eq!(path, project);
                assert_eq!(b, backup);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read(&backup).unwrap(), b"last good copy");
        assert_eq!(std::fs::read(&project).unwrap(), b"half-wri");
    }

    #[test]
    fn test_begin_on_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let err = BackupGuard::begin(&temp.path().join("Missing.vcxproj")).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Io {
                op: IoOp::Copy,
                ..
            }
        ));
    }
}
