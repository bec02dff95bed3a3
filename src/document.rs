//! Cleaning-document loading and one-time validation.
//!
//! The persisted document carries two objects: a `pattern_list` of name
//! templates and a `file_system_data` tree mirroring the captured directory,
//! with a keep/delete state on every entry. Validation happens here, once, so
//! downstream components can assume a well-formed tree.

use crate::error::CleanError;
use crate::tree::{EntryState, Node};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A loaded and validated cleaning document.
///
/// `tree` holds the captured root's top-level entries, keyed by name, exactly
/// as the JSON's `file_system_data` object lays them out.
#[derive(Debug)]
pub struct Document {
    pub patterns: Vec<String>,
    pub tree: BTreeMap<String, Node>,
}

/// Raw shape of the persisted document, prior to validation.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    pattern_list: Vec<String>,
    file_system_data: BTreeMap<String, RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: RawKind,
    #[serde(default)]
    name: Option<String>,
    rel_path: String,
    state: EntryState,
    #[serde(default)]
    children: Option<BTreeMap<String, RawNode>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    File,
    Folder,
}

/// Read and validate a cleaning document from disk.
pub fn load(path: &Path) -> Result<Document, CleanError> {
    let text = fs::read_to_string(path).map_err(|source| CleanError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: RawDocument =
        serde_json::from_str(&text).map_err(|source| CleanError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut tree = BTreeMap::new();
    for (name, node) in raw.file_system_data {
        let validated = validate_node(&name, node)?;
        tree.insert(name, validated);
    }

    Ok(Document {
        patterns: raw.pattern_list,
        tree,
    })
}

/// Convert a raw node into the tagged tree model, enforcing the shape
/// contract: folders carry a children mapping, files never do, and no
/// `rel_path` escapes the captured root.
fn validate_node(name: &str, raw: RawNode) -> Result<Node, CleanError> {
    let rel_path = raw.rel_path;

    if Path::new(&rel_path).is_absolute() || rel_path.split('/').any(|seg| seg == "..") {
        return Err(CleanError::MalformedTree {
            reason: format!("rel_path {rel_path:?} escapes the captured root"),
        });
    }

    let node_name = raw.name.unwrap_or_else(|| name.to_string());

    match raw.kind {
        RawKind::File => {
            if raw.children.is_some() {
                return Err(CleanError::MalformedTree {
                    reason: format!("file node {rel_path:?} carries a children mapping"),
                });
            }
            Ok(Node::File {
                name: node_name,
                rel_path,
                state: raw.state,
            })
        }
        RawKind::Folder => {
            let Some(raw_children) = raw.children else {
                return Err(CleanError::MalformedTree {
                    reason: format!("folder node {rel_path:?} lacks a children mapping"),
                });
            };

            let mut children = BTreeMap::new();
            for (child_name, child) in raw_children {
                let validated = validate_node(&child_name, child)?;
                children.insert(child_name, validated);
            }

            Ok(Node::Folder {
                name: node_name,
                rel_path,
                state: raw.state,
                children,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{aggregate, EntryState};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(json: &str) -> Result<Document, CleanError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load(file.path())
    }

    #[test]
    fn test_load_minimal_document() {
        let doc = load_str(
            r#"{
                "pattern_list": [],
                "file_system_data": {
                    "a": {"type": "file", "name": "a", "rel_path": "a", "state": "delete"}
                }
            }"#,
        )
        .unwrap();

        assert!(doc.patterns.is_empty());
        let node = &doc.tree["a"];
        assert_eq!(node.rel_path(), "a");
        assert_eq!(node.state(), EntryState::Delete);
    }

    #[test]
    fn test_load_nested_tree_with_patterns() {
        let doc = load_str(
            r#"{
                "pattern_list": ["task-rest*"],
                "file_system_data": {
                    "task-rest01": {
                        "type": "folder",
                        "name": "task-rest01",
                        "rel_path": "task-rest01",
                        "state": "keep",
                        "size": 4096,
                        "children": {
                            "junk.txt": {
                                "type": "file",
                                "name": "junk.txt",
                                "rel_path": "task-rest01/junk.txt",
                                "state": "delete"
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.patterns, vec!["task-rest*"]);
        let plan = aggregate(&doc.tree);
        assert_eq!(plan.files, vec!["task-rest01/junk.txt"]);
        assert!(plan.dirs.is_empty());
    }

    #[test]
    fn test_folder_without_children_is_malformed() {
        let err = load_str(
            r#"{
                "pattern_list": [],
                "file_system_data": {
                    "sub": {"type": "folder", "name": "sub", "rel_path": "sub", "state": "keep"}
                }
            }"#,
        )
        .unwrap_err();

        assert!(matches!(err, CleanError::MalformedTree { .. }));
        assert!(err.to_string().contains("lacks a children mapping"));
    }

    #[test]
    fn test_file_with_children_is_malformed() {
        let err = load_str(
            r#"{
                "pattern_list": [],
                "file_system_data": {
                    "a": {
                        "type": "file",
                        "name": "a",
                        "rel_path": "a",
                        "state": "keep",
                        "children": {}
                    }
                }
            }"#,
        )
        .unwrap_err();

        assert!(matches!(err, CleanError::MalformedTree { .. }));
        assert!(err.to_string().contains("carries a children mapping"));
    }

    #[test]
    fn test_rel_path_escaping_root_is_malformed() {
        let err = load_str(
            r#"{
                "pattern_list": [],
                "file_system_data": {
                    "a": {"type": "file", "name": "a", "rel_path": "../a", "state": "delete"}
                }
            }"#,
        )
        .unwrap_err();

        assert!(matches!(err, CleanError::MalformedTree { .. }));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = load_str("{ not json").unwrap_err();
        assert!(matches!(err, CleanError::DocumentParse { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load(Path::new("/nonexistent/cleaning.json")).unwrap_err();
        assert!(matches!(err, CleanError::DocumentRead { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
