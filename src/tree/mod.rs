//! Markdown file tree module
//!
//! Builds a JSON-serializable nested structure describing all Markdown
//! files under a content root. Rebuilt fresh on every request; nothing
//! is cached between requests.

use crate::logger;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix that marks an entry as a Markdown file
pub const MARKDOWN_EXT: &str = ".md";

/// Traversal depth cap; deeper branches are pruned
const MAX_DEPTH: usize = 32;

/// Nested mapping of directory-entry name to node
pub type FileTree = BTreeMap<String, Node>;

/// A single entry in the file tree
///
/// Directories nest recursively; Markdown files are leaves. On the wire
/// a `File` serializes as boolean `true`, matching what existing viewer
/// clients expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(FileTree),
    File,
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Directory(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, node) in entries {
                    map.serialize_entry(name, node)?;
                }
                map.end()
            }
            Self::File => serializer.serialize_bool(true),
        }
    }
}

/// Build the file tree rooted at `root`
///
/// A nonexistent root yields an empty tree rather than an error. Entries
/// that are neither directories nor Markdown files are skipped. Symlink
/// cycles are detected by tracking visited canonical paths and pruned as
/// empty subtrees.
pub fn build_tree(root: &Path) -> FileTree {
    let mut visited = HashSet::new();
    walk(root, 0, &mut visited)
}

fn walk(dir: &Path, depth: usize, visited: &mut HashSet<PathBuf>) -> FileTree {
    let mut tree = FileTree::new();

    if depth >= MAX_DEPTH {
        logger::log_warning(&format!(
            "Directory tree deeper than {MAX_DEPTH} levels, pruning at '{}'",
            dir.display()
        ));
        return tree;
    }

    // A root that does not exist resolves to an empty tree, not an error
    let Ok(real_path) = dir.canonicalize() else {
        return tree;
    };
    if !visited.insert(real_path) {
        logger::log_warning(&format!(
            "Symlink cycle detected at '{}', pruning",
            dir.display()
        ));
        return tree;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!("Cannot read directory '{}': {e}", dir.display()));
            return tree;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if path.is_dir() {
            // Subdirectories are kept even when their subtree is empty
            tree.insert(name, Node::Directory(walk(&path, depth + 1, visited)));
        } else if name.ends_with(MARKDOWN_EXT) && path.is_file() {
            tree.insert(name, Node::File);
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("create file");
    }

    #[test]
    fn test_nonexistent_root_is_empty() {
        let tree = build_tree(Path::new("/definitely/not/a/real/dir"));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_only_non_markdown_files_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "image.png");
        assert!(build_tree(dir.path()).is_empty());
    }

    #[test]
    fn test_nested_markdown_files() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "a.md");
        touch(dir.path(), "b.txt");
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).expect("mkdir");
        touch(&sub, "c.md");

        let tree = build_tree(dir.path());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("a.md"), Some(&Node::File));
        assert!(!tree.contains_key("b.txt"));
        match tree.get("sub") {
            Some(Node::Directory(entries)) => {
                assert_eq!(entries.get("c.md"), Some(&Node::File));
            }
            other => panic!("expected sub directory, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_subdirectory_kept_as_empty_mapping() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("empty")).expect("mkdir");

        let tree = build_tree(dir.path());
        assert_eq!(tree.get("empty"), Some(&Node::Directory(FileTree::new())));
    }

    #[test]
    fn test_wire_format_uses_boolean_leaves() {
        let dir = TempDir::new().expect("tempdir");
        let mut f = File::create(dir.path().join("a.md")).expect("create");
        f.write_all(b"# A").expect("write");
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).expect("mkdir");
        touch(&sub, "c.md");

        let json = serde_json::to_string(&build_tree(dir.path())).expect("serialize");
        assert_eq!(json, r#"{"a.md":true,"sub":{"c.md":true}}"#);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_pruned() {
        let dir = TempDir::new().expect("tempdir");
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).expect("mkdir");
        touch(&sub, "c.md");
        // sub/loop -> <root>, which would recurse forever without the guard
        std::os::unix::fs::symlink(dir.path(), sub.join("loop")).expect("symlink");

        let tree = build_tree(dir.path());
        match tree.get("sub") {
            Some(Node::Directory(entries)) => {
                assert_eq!(entries.get("c.md"), Some(&Node::File));
                assert_eq!(entries.get("loop"), Some(&Node::Directory(FileTree::new())));
            }
            other => panic!("expected sub directory, got {other:?}"),
        }
    }
}
