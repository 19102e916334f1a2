//! Project name inference from the `.vcxproj` in the root directory.

use crate::error::{FilterError, IoOp, Result};
use crate::utils::read_text;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ProjectName>(.+?)</ProjectName>")
        .unwrap_or_else(|e| unreachable!("static project name pattern: {e}"))
});

/// First `*.vcxproj` directly inside `dir`, in file-name order.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if `dir` cannot be listed.
pub fn find_project_file(dir: &Path) -> Result<Option<PathBuf>> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| FilterError::io(IoOp::ReadDir, dir, e))?;

    let mut candidates: Vec<PathBuf> = read_dir
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("vcxproj"))
                && !is_backup(path)
        })
        .collect();
    candidates.sort();

    Ok(candidates.into_iter().next())
}

/// Leftover `<stem>_backup.vcxproj` files are never treated as the project.
fn is_backup(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|s| s.to_string_lossy().ends_with("_backup"))
}

/// Reads the `<ProjectName>` of `project`, falling back to its file stem.
///
/// # Errors
///
/// Returns [`FilterError::Io`] or [`FilterError::InvalidEncoding`] if the
/// file cannot be read as text.
pub fn project_name_of(project: &Path) -> Result<String> {
    let text = read_text(project)?;
    if let Some(name) = PROJECT_NAME
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
    {
        return Ok(name.to_string());
    }

    Ok(project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default())
}

/// Project file found in a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedProject {
    /// The `.vcxproj` file itself.
    pub path: PathBuf,
    /// File stem; both manifest paths are derived from it.
    pub base_name: String,
    /// `<ProjectName>` if declared, else the stem. Display only.
    pub display_name: String,
}

/// Finds the project file in `root` and reads its names.
///
/// # Errors
///
/// Returns [`FilterError::NoTargetFound`] when `root` holds no project file
/// or its stem is empty.
pub fn detect_project(root: &Path) -> Result<DetectedProject> {
    let path =
        find_project_file(root)?.ok_or_else(|| FilterError::NoTargetFound(root.to_path_buf()))?;
    let base_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if base_name.is_empty() {
        return Err(FilterError::NoTargetFound(root.to_path_buf()));
    }
    let display_name = project_name_of(&path)?;

    Ok(DetectedProject {
        path,
        base_name,
        display_name,
    })
}

/// Infers the display name of the project in `root`.
///
/// # Errors
///
/// See [`detect_project`].
pub fn detect_project_name(root: &Path) -> Result<String> {
    detect_project(root).map(|project| project.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_from_project_name_element() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("Build.vcxproj"),
            "<Project>\n  <PropertyGroup>\n    <ProjectName>Engine</ProjectName>\n  </PropertyGroup>\n</Project>\n",
        )
        .unwrap();

        assert_eq!(detect_project_name(temp.path()).unwrap(), "Engine");
    }

    #[test]
    fn test_detect_falls_back_to_stem() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Game.vcxproj"), "<Project>\n</Project>\n").unwrap();

        assert_eq!(detect_project_name(temp.path()).unwrap(), "Game");
    }

    #[test]
    fn test_detect_picks_first_sorted_and_skips_backups() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("B.vcxproj"), "<Project/>").unwrap();
        std::fs::write(temp.path().join("A_backup.vcxproj"), "<Project/>").unwrap();
        std::fs::write(temp.path().join("C.vcxproj"), "<Project/>").unwrap();
        std::fs::write(temp.path().join("B.vcxproj.filters"), "<Project/>").unwrap();

        assert_eq!(detect_project_name(temp.path()).unwrap(), "B");
    }

    #[test]
    fn test_detect_project_keys_paths_by_stem() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("Build.vcxproj"),
            "<Project>\n    <ProjectName>Engine</ProjectName>\n</Project>\n",
        )
        .unwrap();

        let detected = detect_project(temp.path()).unwrap();

        assert_eq!(detected.base_name, "Build");
        assert_eq!(detected.display_name, "Engine");
        assert_eq!(detected.path, temp.path().join("Build.vcxproj"));
    }

    #[test]
    fn test_detect_without_project_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("main.cpp"), "int main() {}").unwrap();

        assert!(matches!(
            detect_project_name(temp.path()),
            Err(FilterError::NoTargetFound(_))
        ));
    }
}
