//! Read-only tree projection of the derived hierarchy for operator review.
//!
//! Nodes live in an arena and refer to their children by index. The projection
//! never touches the filesystem.

use crate::hierarchy::GroupHierarchy;
use crate::scanner::{FileEntry, FileRole};
use std::collections::HashMap;

/// What a preview node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The scanned root directory.
    Root,
    /// A derived group.
    Group,
    /// A discovered file and its role.
    File(FileRole),
}

/// One node of the preview tree.
#[derive(Debug, Clone)]
pub struct PreviewNode {
    /// Display label (last path segment).
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Arena indices of child nodes.
    pub children: Vec<usize>,
}

/// Arena-backed preview tree; index 0 is the root.
#[derive(Debug, Clone)]
pub struct PreviewTree {
    nodes: Vec<PreviewNode>,
}

impl PreviewTree {
    /// Arena index of the root node.
    pub const ROOT: usize = 0;

    /// Projects `groups` and `entries` under a root labelled `root_label`.
    ///
    /// Directories are listed before files; both are sorted by name.
    #[must_use]
    pub fn project(root_label: &str, groups: &GroupHierarchy, entries: &[FileEntry]) -> Self {
        let mut tree = Self {
            nodes: vec![PreviewNode {
                name: root_label.to_string(),
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
        };

        let mut group_nodes: HashMap<&str, usize> = HashMap::new();
        for group in groups.sorted() {
            let parent = group_nodes
                .get(group.parent_path.as_str())
                .copied()
                .unwrap_or(Self::ROOT);
            let idx = tree.push(parent, group.name(), NodeKind::Group);
            group_nodes.insert(group.path.as_str(), idx);
        }

        let mut sorted_entries: Vec<&FileEntry> = entries.iter().collect();
        sorted_entries.sort();
        for entry in sorted_entries {
            let parent = group_nodes
                .get(entry.group())
                .copied()
                .unwrap_or(Self::ROOT);
            tree.push(parent, entry.file_name(), NodeKind::File(entry.role));
        }

        tree.sort_children();
        tree
    }

    /// Appends a node under `parent` and returns its index.
    fn push(&mut self, parent: usize, name: &str, kind: NodeKind) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PreviewNode {
            name: name.to_string(),
            kind,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Orders every child list: groups first, then files, each by name.
    fn sort_children(&mut self) {
        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|&a, &b| {
                let (na, nb) = (&self.nodes[a], &self.nodes[b]);
                let rank = |n: &PreviewNode| u8::from(matches!(n.kind, NodeKind::File(_)));
                rank(na).cmp(&rank(nb)).then_with(|| na.name.cmp(&nb.name))
            });
            self.nodes[i].children = children;
        }
    }

    /// Node at `idx`.
    #[must_use]
    pub fn node(&self, idx: usize) -> &PreviewNode {
        &self.nodes[idx]
    }

    /// Total number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root node is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of file nodes.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::File(_)))
            .count()
    }

    /// Number of group nodes.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Group)
            .count()
    }

    /// Renders the tree as ASCII art.
    ///
    /// ```text
    /// MyProject
    /// ├── src/
    /// │   ├── util/
    /// │   │   └── b.h
    /// │   └── a.cpp
    /// └── main.cpp
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.nodes[Self::ROOT].name);
        output.push('\n');

        let children = &self.nodes[Self::ROOT].children;
        for (i, &child) in children.iter().enumerate() {
            self.render_node(&mut output, child, "", i == children.len() - 1);
        }
        output
    }

    /// Recursively render a node and its children.
    fn render_node(&self, output: &mut String, idx: usize, prefix: &str, is_last: bool) {
        let node = &self.nodes[idx];
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&node.name);
        if node.kind == NodeKind::Group {
            output.push('/');
        }
        output.push('\n');

        let continuation = if is_last { "    " } else { "│   " };
        let child_prefix = format!("{prefix}{continuation}");
        for (i, &child) in node.children.iter().enumerate() {
            self.render_node(output, child, &child_prefix, i == node.children.len() - 1);
        }
    }
}
