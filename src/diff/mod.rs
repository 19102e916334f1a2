//! Unified diff of the item manifest for `--dry-run`.
//!
//! Output follows the git layout: `--- a/` and `+++ b/` headers, `@@` hunk
//! headers, then context, deletion and insertion lines.

use anyhow::Result;
use colored::Colorize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::io::Write;
use std::path::Path;
use tracing::{Level, debug, span};

/// Rendering options for [`write_unified_diff`].
#[derive(Debug, Clone, Copy)]
pub struct DiffStyle {
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    /// Colorize headers and changed lines
    pub colorize: bool,
}

impl Default for DiffStyle {
    fn default() -> Self {
        Self {
            context_lines: 3,
            colorize: true,
        }
    }
}

/// Writes a unified diff of `old` against `new` for `path`.
///
/// Returns the number of inserted plus deleted lines. Identical inputs
/// produce the two headers and no hunks.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_unified_diff(
    old: &str,
    new: &str,
    path: &Path,
    style: DiffStyle,
    writer: &mut dyn Write,
) -> Result<usize> {
    let span = span!(Level::DEBUG, "diff", path = %path.display());
    let _guard = span.enter();

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new);

    let old_header = format!("--- a/{}", path.display());
    let new_header = format!("+++ b/{}", path.display());
    if style.colorize {
        writeln!(writer, "{}", old_header.red())?;
        writeln!(writer, "{}", new_header.green())?;
    } else {
        writeln!(writer, "{old_header}")?;
        writeln!(writer, "{new_header}")?;
    }

    let mut changed = 0usize;
    for hunk in diff
        .unified_diff()
        .context_radius(style.context_lines)
        .iter_hunks()
    {
        let header = hunk.header().to_string();
        if style.colorize {
            writeln!(writer, "{}", header.cyan())?;
        } else {
            writeln!(writer, "{header}")?;
        }

        for change in hunk.iter_changes() {
            let text = change.to_string();
            let text = text.trim_end_matches('\n');
            let line = match change.tag() {
                ChangeTag::Delete => {
                    changed += 1;
                    let line = format!("-{text}");
                    if style.colorize { line.red().to_string() } else { line }
                }
                ChangeTag::Insert => {
                    changed += 1;
                    let line = format!("+{text}");
                    if style.colorize { line.green().to_string() } else { line }
                }
                ChangeTag::Equal => format!(" {text}"),
            };
            writeln!(writer, "{line}")?;
        }
    }

    debug!(changed, "diff generated");
    Ok(changed)
}
