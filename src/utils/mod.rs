//! Utility functions and helpers.
//!
//! - Path normalization ([`paths`])
//! - Ignore pattern matching for the tree walk
//! - XML escaping for manifest attribute and text values
//! - UTF-8 manifest reading and verified writes

/// Path normalization between filesystem, canonical and MSBuild forms
pub mod paths;

use crate::error::{FilterError, IoOp, Result};
use std::io::Write as _;
use std::path::Path;

/// Determines if a relative path should be ignored based on provided patterns.
///
/// Supported forms: `dir/` (any component), `*suffix`, `prefix*`,
/// `*contains*`, and a bare name matching the whole path or any component.
#[must_use]
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if let Some(dir_name) = pattern.strip_suffix('/') {
            if path.components().any(|c| c.as_os_str() == dir_name) {
                return true;
            }
        } else if pattern.len() > 1 && pattern.starts_with('*') && pattern.ends_with('*') {
            let search = &pattern[1..pattern.len() - 1];
            if path_str.contains(search) {
                return true;
            }
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            if path_str.ends_with(suffix) {
                return true;
            }
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            if path_str.starts_with(prefix) {
                return true;
            }
        } else if path_str == pattern.as_str()
            || path.components().any(|c| c.as_os_str() == pattern.as_str())
        {
            return true;
        }
    }

    false
}

/// Escapes the five XML special characters.
#[must_use]
pub fn xml_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reverses [`xml_escape`]. Unknown entities are left untouched.
#[must_use]
pub fn xml_unescape(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Reads a manifest as UTF-8 text.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if the file cannot be read and
/// [`FilterError::InvalidEncoding`] if it is not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| FilterError::io(IoOp::Read, path, e))?;
    simdutf8::basic::from_utf8(&bytes).map_err(|e| FilterError::InvalidEncoding {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    // Already validated, so no replacement characters are introduced.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `contents` to `path` and checks the result is present and non-empty.
///
/// # Errors
///
/// Returns [`FilterError::Io`] on open/write/sync failures and
/// [`FilterError::IncompleteWrite`] if the post-write check fails.
pub fn write_verified(path: &Path, contents: &str) -> Result<()> {
    let mut file =
        std::fs::File::create(path).map_err(|e| FilterError::io(IoOp::Open, path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| FilterError::io(IoOp::Write, path, e))?;
    drop(file);

    verify_written(path)
}

/// Fails with [`FilterError::IncompleteWrite`] unless `path` exists with a
/// non-zero length.
///
/// # Errors
///
/// See above.
pub fn verify_written(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(FilterError::IncompleteWrite(path.to_path_buf())),
    }
}
