//! Group (filter) hierarchy derived from a flat file listing.
//!
//! Groups live in an arena addressed by [`GroupIndex`]; parent links are
//! stored as path keys, so growing the arena never invalidates a link.
//! The root directory itself is never a group.

use crate::scanner::FileEntry;
use crate::utils::paths::CANONICAL_SEPARATOR;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier emitted as a filter's `UniqueIdentifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for GroupId {
    /// Renders as `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        write!(f, "{{{}}}", self.0.hyphenated().encode_upper(&mut buf))
    }
}

/// Position of a group inside a [`GroupHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupIndex(usize);

/// One directory level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Canonical directory path, e.g. `src/util`.
    pub path: String,
    /// Parent directory path; empty for top-level groups.
    pub parent_path: String,
    /// Identifier regenerated on every derivation.
    pub id: GroupId,
}

impl GroupNode {
    /// Last path segment, used as the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        crate::utils::paths::file_name(&self.path)
    }

    /// Whether this group hangs directly off the root.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_path.is_empty()
    }
}

/// Deduplicated set of groups keyed by path.
#[derive(Debug, Clone, Default)]
pub struct GroupHierarchy {
    /// Arena of nodes in insertion order
    nodes: Vec<GroupNode>,
    /// Path to arena position
    index: HashMap<String, GroupIndex>,
}

impl GroupHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives groups from `entries` with freshly generated identifiers.
    ///
    /// Entries whose role is not buildable are ignored.
    #[must_use]
    pub fn derive(entries: &[FileEntry]) -> Self {
        Self::derive_with(entries, GroupId::generate)
    }

    /// Derives groups, drawing identifiers from `next_id`.
    #[must_use]
    pub fn derive_with<F>(entries: &[FileEntry], mut next_id: F) -> Self
    where
        F: FnMut() -> GroupId,
    {
        let mut hierarchy = Self::new();
        for entry in entries.iter().filter(|e| e.role.is_buildable()) {
            hierarchy.insert_chain(entry.group(), &mut next_id);
        }
        hierarchy
    }

    /// Inserts `dir` and every ancestor not yet present.
    ///
    /// Returns the index of `dir`, or `None` when `dir` is the root.
    pub fn insert_chain<F>(&mut self, dir: &str, next_id: &mut F) -> Option<GroupIndex>
    where
        F: FnMut() -> GroupId,
    {
        let mut accumulated = String::new();
        let mut last = None;

        for segment in dir.split(CANONICAL_SEPARATOR).filter(|s| !s.is_empty()) {
            let parent_path = accumulated.clone();
            if !accumulated.is_empty() {
                accumulated.push(CANONICAL_SEPARATOR);
            }
            accumulated.push_str(segment);

            let idx = match self.index.get(&accumulated) {
                Some(&idx) => idx,
                None => {
                    let idx = GroupIndex(self.nodes.len());
                    self.nodes.push(GroupNode {
                        path: accumulated.clone(),
                        parent_path,
                        id: next_id(),
                    });
                    self.index.insert(accumulated.clone(), idx);
                    idx
                }
            };
            last = Some(idx);
        }

        last
    }

    /// Looks up a group by its canonical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&GroupNode> {
        self.index.get(path).map(|&idx| &self.nodes[idx.0])
    }

    /// Arena position of the group at `path`.
    #[must_use]
    pub fn index_of(&self, path: &str) -> Option<GroupIndex> {
        self.index.get(path).copied()
    }

    /// Node at an arena position.
    #[must_use]
    pub fn node(&self, idx: GroupIndex) -> &GroupNode {
        &self.nodes[idx.0]
    }

    /// Parent group of `node`, `None` for top-level groups.
    #[must_use]
    pub fn parent(&self, node: &GroupNode) -> Option<&GroupNode> {
        if node.is_top_level() {
            None
        } else {
            self.get(&node.parent_path)
        }
    }

    /// Direct children of the group at `path` (`""` for the root), sorted by path.
    #[must_use]
    pub fn children(&self, path: &str) -> Vec<&GroupNode> {
        let mut children: Vec<_> = self
            .nodes
            .iter()
            .filter(|n| n.parent_path == path)
            .collect();
        children.sort_by(|a, b| a.path.cmp(&b.path));
        children
    }

    /// Whether a group exists for `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no groups were derived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupNode> {
        self.nodes.iter()
    }

    /// Groups sorted by path; parents always precede their children.
    #[must_use]
    pub fn sorted(&self) -> Vec<&GroupNode> {
        let mut nodes: Vec<_> = self.nodes.iter().collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        nodes
    }

    /// The set of group paths, ignoring identifiers.
    #[must_use]
    pub fn paths(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRole;

    fn scenario() -> Vec<FileEntry> {
        vec![
            FileEntry::new("src/a.cpp"),
            FileEntry::new("src/util/b.h"),
            FileEntry::new("main.cpp"),
        ]
    }

    #[test]
    fn test_derive_scenario() {
        let groups = GroupHierarchy::derive(&scenario());

        assert_eq!(groups.len(), 2);
        let src = groups.get("src").unwrap();
        assert_eq!(src.parent_path, "");
        assert!(src.is_top_level());
        let util = groups.get("src/util").unwrap();
        assert_eq!(util.parent_path, "src");
        assert_eq!(util.name(), "util");
        assert_eq!(groups.parent(util).map(|p| p.path.as_str()), Some("src"));
    }

    #[test]
    fn test_root_files_produce_no_groups() {
        let groups = GroupHierarchy::derive(&[FileEntry::new("main.cpp"), FileEntry::new("a.h")]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_intermediate_directories_are_created() {
        let groups = GroupHierarchy::derive(&[FileEntry::new("a/b/c/d.cpp")]);
        assert_eq!(
            groups.paths().into_iter().collect::<Vec<_>>(),
            vec!["a", "a/b", "a/b/c"]
        );
        assert_eq!(groups.get("a/b/c").unwrap().parent_path, "a/b");
    }

    #[test]
    fn test_other_roles_are_excluded() {
        let groups =
            GroupHierarchy::derive(&[FileEntry::with_role("docs/readme.md", FileRole::Other)]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_identifiers_are_unique_and_formatted() {
        let groups = GroupHierarchy::derive(&scenario());
        let ids: std::collections::HashSet<_> = groups.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), groups.len());

        let rendered = groups.get("src").unwrap().id.to_string();
        assert_eq!(rendered.len(), 38);
        assert!(rendered.starts_with('{') && rendered.ends_with('}'));
        assert_eq!(rendered, rendered.to_uppercase());
    }

    #[test]
    fn test_derive_with_deterministic_ids() {
        let mut counter = 0u128;
        let groups = GroupHierarchy::derive_with(&scenario(), || {
            counter += 1;
            GroupId::from_uuid(Uuid::from_u128(counter))
        });
        assert_eq!(
            groups.get("src").unwrap().id.to_string(),
            "{00000000-0000-0000-0000-000000000001}"
        );
        assert_eq!(
            groups.get("src/util").unwrap().id.to_string(),
            "{00000000-0000-0000-0000-000000000002}"
        );
    }

    #[test]
    fn test_children_and_sorted_order() {
        let groups = GroupHierarchy::derive(&[
            FileEntry::new("src/z/x.cpp"),
            FileEntry::new("lib/y.h"),
            FileEntry::new("src/a/w.cpp"),
        ]);
        let top: Vec<_> = groups.children("").iter().map(|n| n.path.as_str()).collect();
        assert_eq!(top, vec!["lib", "src"]);
        let under_src: Vec<_> = groups
            .children("src")
            .iter()
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(under_src, vec!["src/a", "src/z"]);

        let sorted: Vec<_> = groups.sorted().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(sorted, vec!["lib", "src", "src/a", "src/z"]);
    }

    #[test]
    fn test_derivation_is_order_independent() {
        let mut entries = scenario();
        let forward = GroupHierarchy::derive(&entries);
        entries.reverse();
        let backward = GroupHierarchy::derive(&entries);
        assert_eq!(forward.paths(), backward.paths());
    }
}
