use crate::utils::paths::extension_lower;
use std::fmt;

/// Build role of a discovered file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileRole {
    /// Translation unit handed to the compiler (`.cpp`, `.c`).
    CompiledSource,
    /// Header pulled in by `#include` (`.h`, `.hpp`).
    IncludableHeader,
    /// Anything else; never part of the group hierarchy.
    Other,
}

impl FileRole {
    /// Classifies a path by its case-folded extension.
    #[must_use]
    pub fn classify(path: &str) -> Self {
        match extension_lower(path).as_deref() {
            Some("cpp" | "c") => Self::CompiledSource,
            Some("h" | "hpp") => Self::IncludableHeader,
            _ => Self::Other,
        }
    }

    /// MSBuild item element name for this role.
    #[must_use]
    pub const fn element_kind(self) -> &'static str {
        match self {
            Self::CompiledSource => "ClCompile",
            Self::IncludableHeader => "ClInclude",
            Self::Other => "None",
        }
    }

    /// Inverse of [`FileRole::element_kind`].
    #[must_use]
    pub fn from_element_kind(kind: &str) -> Option<Self> {
        match kind {
            "ClCompile" => Some(Self::CompiledSource),
            "ClInclude" => Some(Self::IncludableHeader),
            "None" => Some(Self::Other),
            _ => None,
        }
    }

    /// Whether files of this role take part in the tree walk and hierarchy.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(self, Self::CompiledSource | Self::IncludableHeader)
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_kind())
    }
}
