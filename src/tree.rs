//! Directory-tree model with per-entry keep/delete state, and the aggregation
//! pass that turns a reviewed tree into an ordered deletion plan.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Reviewed decision recorded for a single tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    Keep,
    Delete,
}

/// A node in the captured directory snapshot.
///
/// Folder children are keyed by entry name in a sorted map, so traversal
/// order is stable across runs. Every node's `rel_path` is relative to the
/// captured root, POSIX-style.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    File {
        name: String,
        rel_path: String,
        state: EntryState,
    },
    Folder {
        name: String,
        rel_path: String,
        state: EntryState,
        children: BTreeMap<String, Node>,
    },
}

impl Node {
    pub fn rel_path(&self) -> &str {
        match self {
            Node::File { rel_path, .. } | Node::Folder { rel_path, .. } => rel_path,
        }
    }

    pub fn state(&self) -> EntryState {
        match self {
            Node::File { state, .. } | Node::Folder { state, .. } => *state,
        }
    }
}

/// Ordered deletion plan extracted from a reviewed tree.
///
/// The combined processing order is all of `files`, then all of `dirs`.
/// `dirs` is deepest-nesting-first so a marked directory is always removed
/// before a marked ancestor.
#[derive(Debug, Default, PartialEq)]
pub struct DeletionPlan {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl DeletionPlan {
    /// All plan entries in processing order: files, then dirs deepest-first.
    pub fn ordered(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.files.len() + self.dirs.len());
        out.extend(self.files.iter().cloned());
        out.extend(self.dirs.iter().cloned());
        out
    }

    /// True when the plan would remove the captured root itself. The capture
    /// UI records the root as an empty or `"."` relative path.
    pub fn deletes_root(&self) -> bool {
        self.files
            .iter()
            .chain(self.dirs.iter())
            .any(|p| p.is_empty() || p == ".")
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Walk the tree and collect the relative paths marked for deletion.
///
/// Depth-first pre-order; a marked folder is recorded before its children are
/// visited, and the folder list is reversed afterward so descendants come out
/// ahead of their ancestors.
pub fn aggregate(tree: &BTreeMap<String, Node>) -> DeletionPlan {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for node in tree.values() {
        collect(node, &mut files, &mut dirs);
    }

    dirs.reverse();
    DeletionPlan { files, dirs }
}

fn collect(node: &Node, files: &mut Vec<String>, dirs: &mut Vec<String>) {
    match node {
        Node::File {
            rel_path, state, ..
        } => {
            if *state == EntryState::Delete {
                files.push(rel_path.clone());
            }
        }
        Node::Folder {
            rel_path,
            state,
            children,
            ..
        } => {
            if *state == EntryState::Delete {
                dirs.push(rel_path.clone());
            }
            for child in children.values() {
                collect(child, files, dirs);
            }
        }
    }
}
