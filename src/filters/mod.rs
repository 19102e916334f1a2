//! Filter manifest (`<name>.vcxproj.filters`) rendering and writing.
//!
//! The filter manifest is fully regenerated on every run, so there is no
//! backup for it. A write that reports failure leaves a file that must not be
//! trusted.

use crate::error::{FilterError, IoOp, Result};
use crate::hierarchy::GroupHierarchy;
use crate::scanner::FileEntry;
use crate::utils::{paths::to_msbuild, write_verified, xml_escape};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension appended to the project name for the filter manifest.
pub const FILTERS_EXTENSION: &str = ".vcxproj.filters";

/// XML namespace of MSBuild project documents.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Path of the filter manifest for `project_name` inside `project_dir`.
#[must_use]
pub fn filters_path(project_dir: &Path, project_name: &str) -> PathBuf {
    project_dir.join(format!("{project_name}{FILTERS_EXTENSION}"))
}

/// Counts reported after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiltersSummary {
    /// File that was written.
    pub path: PathBuf,
    /// Number of `<Filter>` declarations.
    pub groups: usize,
    /// Number of file declarations.
    pub files: usize,
    /// Bytes written.
    pub bytes: u64,
}

/// Serializes the complete filter manifest document.
///
/// Groups are emitted sorted by path, files in sorted relative-path order.
#[must_use]
pub fn render(groups: &GroupHierarchy, entries: &[FileEntry]) -> String {
    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    let _ = writeln!(
        doc,
        "<Project ToolsVersion=\"4.0\" xmlns=\"{MSBUILD_NAMESPACE}\">"
    );

    doc.push_str("  <ItemGroup>\n");
    for group in groups.sorted() {
        let _ = writeln!(
            doc,
            "    <Filter Include=\"{}\">",
            xml_escape(&to_msbuild(&group.path))
        );
        if !group.is_top_level() {
            let _ = writeln!(
                doc,
                "      <Filter>{}</Filter>",
                xml_escape(&to_msbuild(&group.parent_path))
            );
        }
        let _ = writeln!(doc, "      <UniqueIdentifier>{}</UniqueIdentifier>", group.id);
        doc.push_str("    </Filter>\n");
    }
    doc.push_str("  </ItemGroup>\n");

    let mut sorted: Vec<&FileEntry> = entries.iter().collect();
    sorted.sort();

    doc.push_str("  <ItemGroup>\n");
    for entry in sorted {
        let kind = entry.role.element_kind();
        let _ = writeln!(
            doc,
            "    <{kind} Include=\"{}\">",
            xml_escape(&to_msbuild(&entry.relative_path))
        );
        let group = entry.group();
        if !group.is_empty() {
            let _ = writeln!(doc, "      <Filter>{}</Filter>", xml_escape(&to_msbuild(group)));
        }
        let _ = writeln!(doc, "    </{kind}>");
    }
    doc.push_str("  </ItemGroup>\n");

    doc.push_str("</Project>\n");
    doc
}

/// Renders and writes the filter manifest to `path`, then verifies it.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if the file cannot be created, written or
/// flushed, and [`FilterError::IncompleteWrite`] if the file is missing or
/// empty afterwards.
pub fn write_filters_file(
    path: &Path,
    groups: &GroupHierarchy,
    entries: &[FileEntry],
) -> Result<FiltersSummary> {
    let document = render(groups, entries);
    write_verified(path, &document)?;

    let bytes = std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| FilterError::io(IoOp::Read, path, e))?;

    info!(
        path = %path.display(),
        groups = groups.len(),
        files = entries.len(),
        bytes,
        "filter manifest written"
    );

    Ok(FiltersSummary {
        path: path.to_path_buf(),
        groups: groups.len(),
        files: entries.len(),
        bytes,
    })
}
