//! Line-preserving model of an existing item manifest (`.vcxproj`).
//!
//! Only `<ClCompile Include="...">` and `<ClInclude Include="...">` lines are
//! interpreted. Every other line is opaque and round-trips byte for byte.

use crate::scanner::{FileEntry, FileRole};
use crate::utils::paths::{to_canonical, to_msbuild};
use crate::utils::{xml_escape, xml_unescape};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Matches a file declaration and captures its element kind and path.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(ClCompile|ClInclude)\s+Include="([^"]+)""#)
        .unwrap_or_else(|e| unreachable!("static declaration pattern: {e}"))
});

/// Closing marker of an item group.
pub const GROUP_CLOSE: &str = "</ItemGroup>";

/// Opening line of the wrapper appended when no item group exists.
pub const GROUP_OPEN_LINE: &str = "  <ItemGroup>";

/// Closing line of the wrapper appended when no item group exists.
pub const GROUP_CLOSE_LINE: &str = "  </ItemGroup>";

/// A file declaration found on a manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Role implied by the element kind.
    pub role: FileRole,
    /// Declared path in canonical form.
    pub relative_path: String,
}

/// One line of the manifest, with the declaration it carries if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    /// Line text without the trailing `\n` (a `\r` is kept verbatim).
    pub text: String,
    /// Parsed declaration, if the line declares a file.
    pub declaration: Option<Declaration>,
}

impl ManifestLine {
    /// Parses a single line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let declaration = DECLARATION.captures(text).and_then(|caps| {
            let role = FileRole::from_element_kind(caps.get(1)?.as_str())?;
            let path = xml_unescape(caps.get(2)?.as_str());
            Some(Declaration {
                role,
                relative_path: to_canonical(&path),
            })
        });
        Self {
            text: text.to_string(),
            declaration,
        }
    }

    /// Renders a new self-closing declaration line for `entry`.
    #[must_use]
    pub fn declare(entry: &FileEntry) -> Self {
        let text = format!(
            "    <{} Include=\"{}\" />",
            entry.role.element_kind(),
            xml_escape(&to_msbuild(&entry.relative_path))
        );
        Self {
            text,
            declaration: Some(Declaration {
                role: entry.role,
                relative_path: entry.relative_path.clone(),
            }),
        }
    }
}

/// Entries the merge must add: missing from the manifest, or declared only
/// under a different role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Entries to declare, in the order they will be inserted.
    pub additions: Vec<FileEntry>,
}

impl MergePlan {
    /// Whether the merge is a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }

    /// Number of declarations to add.
    #[must_use]
    pub fn len(&self) -> usize {
        self.additions.len()
    }
}

/// Ordered lines of an item manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemManifest {
    lines: Vec<ManifestLine>,
    /// Whether lines end in `\r\n`; new lines follow suit.
    crlf: bool,
}

impl ItemManifest {
    /// Splits `text` into lines on `\n`.
    ///
    /// A final newline does not produce an extra empty line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines: Vec<ManifestLine> = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(ManifestLine::parse).collect()
        };
        let crlf = lines.first().is_some_and(|l| l.text.ends_with('\r'));
        Self { lines, crlf }
    }

    /// All lines in document order.
    #[must_use]
    pub fn lines(&self) -> &[ManifestLine] {
        &self.lines
    }

    /// All declarations in document order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.lines.iter().filter_map(|l| l.declaration.as_ref())
    }

    /// Whether `path` is already declared under `role`.
    #[must_use]
    pub fn declares(&self, path: &str, role: FileRole) -> bool {
        self.declarations()
            .any(|d| d.role == role && d.relative_path == path)
    }

    /// Computes the entries not yet declared with their current role.
    ///
    /// An entry that is only declared under another role is planned again;
    /// the stale declaration is left in place.
    #[must_use]
    pub fn plan(&self, entries: &[FileEntry]) -> MergePlan {
        let existing: HashSet<(&str, FileRole)> = self
            .declarations()
            .map(|d| (d.relative_path.as_str(), d.role))
            .collect();

        let mut seen = HashSet::new();
        let additions = entries
            .iter()
            .filter(|e| e.role.is_buildable())
            .filter(|e| !existing.contains(&(e.relative_path.as_str(), e.role)))
            .filter(|e| seen.insert((e.relative_path.clone(), e.role)))
            .cloned()
            .collect();

        MergePlan { additions }
    }

    /// Inserts the planned declarations and returns how many lines were added.
    ///
    /// Lines go immediately before the last line containing `</ItemGroup>`;
    /// if none exists, a new item group wrapping them is appended.
    pub fn apply(&mut self, plan: &MergePlan) -> usize {
        if plan.is_empty() {
            return 0;
        }

        let new_lines: Vec<ManifestLine> = plan
            .additions
            .iter()
            .map(|entry| self.line_ending(ManifestLine::declare(entry)))
            .collect();
        let added = new_lines.len();

        let insert_at = self
            .lines
            .iter()
            .rposition(|l| l.text.contains(GROUP_CLOSE));

        if let Some(idx) = insert_at {
            self.lines.splice(idx..idx, new_lines);
        } else {
            let open = self.line_ending(ManifestLine::parse(GROUP_OPEN_LINE));
            let close = self.line_ending(ManifestLine::parse(GROUP_CLOSE_LINE));
            self.lines.push(open);
            self.lines.extend(new_lines);
            self.lines.push(close);
        }

        added
    }

    /// Adds a `\r` to generated lines when the document uses CRLF.
    fn line_ending(&self, mut line: ManifestLine) -> ManifestLine {
        if self.crlf {
            line.text.push('\r');
        }
        line
    }

    /// Joins the lines with `\n`, ending with a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}
