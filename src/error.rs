//! Error types for the scan, derive, write and merge pipeline.
//!
//! Core modules return [`FilterError`] so callers can match on the failure
//! kind. Command modules wrap it in `anyhow` with additional context.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Filesystem operation that failed, carried inside [`FilterError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Reading directory metadata or listing a directory.
    ReadDir,
    /// Opening or creating a file for writing.
    Open,
    /// Reading a file's contents.
    Read,
    /// Writing or flushing a file's contents.
    Write,
    /// Copying a file (backup and restore).
    Copy,
    /// Removing a file (backup cleanup).
    Remove,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::ReadDir => "read directory",
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
            Self::Copy => "copy",
            Self::Remove => "remove",
        };
        f.write_str(verb)
    }
}

/// Failures surfaced by the core pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Root path does not exist or is not a directory.
    #[error("invalid root directory {}: {reason}", .path.display())]
    InvalidRoot {
        /// Path supplied by the caller.
        path: PathBuf,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// No project name was supplied and none could be inferred.
    #[error("no .vcxproj file found in {}", .0.display())]
    NoTargetFound(PathBuf),

    /// An I/O call on a manifest or backup file failed.
    #[error("failed to {op} {}", .path.display())]
    Io {
        /// Operation being attempted.
        op: IoOp,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A file was absent or zero-length immediately after being written.
    #[error("{} was not created successfully or is empty", .0.display())]
    IncompleteWrite(PathBuf),

    /// A manifest could not be decoded as UTF-8 text.
    #[error("{} is not valid UTF-8: {reason}", .path.display())]
    InvalidEncoding {
        /// Manifest path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A backup from an earlier run is still present.
    ///
    /// It may be the only intact copy of the manifest, so no merge starts
    /// until the operator has recovered or deleted it.
    #[error(
        "backup {} already exists; restore {} from it or delete it before running again",
        .backup.display(),
        .path.display()
    )]
    BackupExists {
        /// Manifest the backup belongs to.
        path: PathBuf,
        /// Leftover backup file.
        backup: PathBuf,
    },

    /// A merge failed and the backup could not be copied back.
    ///
    /// The backup file is left in place so the original content is recoverable.
    #[error(
        "failed to restore {} from {} after error ({cause})",
        .path.display(),
        .backup.display()
    )]
    RestoreFailed {
        /// Manifest that could not be restored.
        path: PathBuf,
        /// Backup still holding the pre-run content.
        backup: PathBuf,
        /// Error that triggered the restore.
        cause: Box<FilterError>,
        /// Error raised by the restore copy itself.
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    /// Shorthand for building an [`FilterError::Io`].
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Short label for the failure kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRoot { .. } => "InvalidRoot",
            Self::NoTargetFound(_) => "NoTargetFound",
            Self::Io { .. } => "IOFailure",
            Self::IncompleteWrite(_) => "IncompleteWrite",
            Self::InvalidEncoding { .. } => "InvalidEncoding",
            Self::BackupExists { .. } => "BackupExists",
            Self::RestoreFailed { .. } => "RestoreFailed",
        }
    }
}

/// Result alias for the core pipeline.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_names_operation_and_path() {
        let err = FilterError::io(
            IoOp::Copy,
            "/tmp/demo.vcxproj",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("failed to copy"));
        assert!(msg.contains("/tmp/demo.vcxproj"));
        assert!(!msg.contains("missing"));
        assert_eq!(err.kind(), "IOFailure");

        // The OS error appears once, through the source chain.
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain.matches("missing").count(), 1);
    }

    #[test]
    fn test_backup_exists_names_both_files() {
        let err = FilterError::BackupExists {
            path: PathBuf::from("Demo.vcxproj"),
            backup: PathBuf::from("Demo_backup.vcxproj"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Demo_backup.vcxproj already exists"));
        assert!(msg.contains("restore Demo.vcxproj"));
        assert_eq!(err.kind(), "BackupExists");
    }

    #[test]
    fn test_restore_failed_keeps_cause() {
        let err = FilterError::RestoreFailed {
            path: PathBuf::from("a.vcxproj"),
            backup: PathBuf::from("a_backup.vcxproj"),
            cause: Box::new(FilterError::IncompleteWrite(PathBuf::from("a.vcxproj"))),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("a_backup.vcxproj"));
        assert!(msg.contains("empty"));
        assert!(!msg.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
