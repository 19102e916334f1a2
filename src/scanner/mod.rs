/// File role classification by extension.
pub mod role;

/// Recursive source tree walk producing [`FileEntry`] listings.
pub mod tree;

pub use role::FileRole;
pub use tree::TreeScanner;

use crate::utils::paths;

/// A discovered file, identified by its canonical relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileEntry {
    /// Path relative to the scan root, `/` separated.
    pub relative_path: String,
    /// Build role derived from the extension.
    pub role: FileRole,
}

impl FileEntry {
    /// Creates an entry, normalizing separators and classifying the role.
    #[must_use]
    pub fn new(relative_path: &str) -> Self {
        let relative_path = paths::to_canonical(relative_path);
        let role = FileRole::classify(&relative_path);
        Self {
            relative_path,
            role,
        }
    }

    /// Creates an entry with an explicit role.
    #[must_use]
    pub fn with_role(relative_path: &str, role: FileRole) -> Self {
        Self {
            relative_path: paths::to_canonical(relative_path),
            role,
        }
    }

    /// Containing directory path; empty when the file sits in the root.
    #[must_use]
    pub fn group(&self) -> &str {
        paths::parent_dir(&self.relative_path)
    }

    /// File name without its directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        paths::file_name(&self.relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_group() {
        let nested = FileEntry::new("src\\util\\b.h");
        assert_eq!(nested.relative_path, "src/util/b.h");
        assert_eq!(nested.group(), "src/util");
        assert_eq!(nested.file_name(), "b.h");
        assert_eq!(nested.role, FileRole::IncludableHeader);

        let top = FileEntry::new("main.cpp");
        assert_eq!(top.group(), "");
        assert_eq!(top.role, FileRole::CompiledSource);
    }
}
