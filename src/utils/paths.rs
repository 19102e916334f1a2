//! Path normalization between the filesystem, the canonical `/` form used by
//! the data model, and the `\` form MSBuild manifests expect.

use std::path::{Component, Path};

/// Separator used for every path stored in the data model.
pub const CANONICAL_SEPARATOR: char = '/';

/// Separator written into `.vcxproj` and `.vcxproj.filters` documents.
pub const MSBUILD_SEPARATOR: char = '\\';

/// Renders `path` relative to `base` in canonical form.
///
/// Relative inputs are treated as already relative to `base`. Returns `None`
/// when an absolute `path` does not live under `base`.
#[must_use]
pub fn relative_canonical(path: &Path, base: &Path) -> Option<String> {
    let relative = if path.is_absolute() {
        path.strip_prefix(base).ok()?
    } else {
        path
    };

    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Some(to_canonical(&parts.join("/")))
}

/// Converts every `\` to `/`, collapsing empty segments.
#[must_use]
pub fn to_canonical(path: &str) -> String {
    path.split(['/', MSBUILD_SEPARATOR])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Converts a canonical path into MSBuild's backslash form.
#[must_use]
pub fn to_msbuild(path: &str) -> String {
    path.replace(CANONICAL_SEPARATOR, "\\")
}

/// Lower-cased extension of the final segment, without the dot.
///
/// Dotfiles such as `.h` have no extension, matching [`Path::extension`].
#[must_use]
pub fn extension_lower(path: &str) -> Option<String> {
    let name = file_name(path);
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Final segment of a canonical path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit_once(CANONICAL_SEPARATOR)
        .map_or(path, |(_, name)| name)
}

/// Directory portion of a canonical path; empty for files in the root.
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once(CANONICAL_SEPARATOR)
        .map_or("", |(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[test]
    fn test_relative_canonical_absolute_under_base() {
        let base = PathBuf::from("/work/proj");
        let path = base.join("src").join("util").join("b.h");
        assert_eq!(
            relative_canonical(&path, &base).as_deref(),
            Some("src/util/b.h")
        );
    }

    #[test]
    fn test_relative_canonical_outside_base() {
        let base = PathBuf::from("/work/proj");
        let path = PathBuf::from("/elsewhere/a.cpp");
        assert_eq!(relative_canonical(&path, &base), None);
    }

    #[test]
    fn test_relative_canonical_relative_input() {
        let base = PathBuf::from("/work/proj");
        let path = PathBuf::from("./src/a.cpp");
        assert_eq!(
            relative_canonical(&path, &base).as_deref(),
            Some("src/a.cpp")
        );
    }

    #[rstest]
    #[case("src\\util\\b.h", "src/util/b.h")]
    #[case("src/util/b.h", "src/util/b.h")]
    #[case("src\\\\a.cpp", "src/a.cpp")]
    #[case(".\\main.cpp", "main.cpp")]
    #[case("", "")]
    fn test_to_canonical(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_canonical(input), expected);
    }

    #[test]
    fn test_to_msbuild() {
        assert_eq!(to_msbuild("src/util/b.h"), "src\\util\\b.h");
        assert_eq!(to_msbuild("main.cpp"), "main.cpp");
    }

    #[rstest]
    #[case("src/a.CPP", Some("cpp"))]
    #[case("b.Hpp", Some("hpp"))]
    #[case("Makefile", None)]
    #[case("dir.d/.h", None)]
    #[case("archive.tar.gz", Some("gz"))]
    fn test_extension_lower(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension_lower(input).as_deref(), expected);
    }

    #[test]
    fn test_parent_dir_and_file_name() {
        assert_eq!(parent_dir("src/util/b.h"), "src/util");
        assert_eq!(parent_dir("main.cpp"), "");
        assert_eq!(file_name("src/util/b.h"), "b.h");
        assert_eq!(file_name("main.cpp"), "main.cpp");
    }
}
