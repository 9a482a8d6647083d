//! Snapshot data model: the directory tree, the per-file content record,
//! and the published snapshot aggregate.

use crate::index::ContentIndex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Directory,
}

/// One node of the immutable snapshot tree.
///
/// `path` is the `/`-joined ancestor chain from the snapshot root (the root
/// itself has an empty path, its children start with `/`). `children` is
/// present iff the node is a directory, and is sorted directories-first,
/// then case-insensitive by name.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNode {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryNode>>,
}

/// Indexed content for a single file node.
///
/// `content` holds the full text, a truncated prefix ending in the
/// truncation marker, or a placeholder; `truncated` / `too_large` are the
/// canonical signals, the marker is only a fallback for string consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub path: String,
    pub content: String,
    pub size_bytes: u64,
    pub truncated: bool,
    pub too_large: bool,
    pub language: &'static str,
}

/// A complete, immutable result of one snapshot build.
///
/// Every file node in `root` has exactly one record in `index` under the
/// identical path, and vice versa. A snapshot is never mutated after
/// publication — a rescan replaces it wholesale under a new generation.
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub root: DirectoryNode,
    pub index: ContentIndex,
}

/// Map a file name to an editor language id, `"plaintext"` when unknown.
pub fn detect_language(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "java" => "java",
        "cpp" | "cc" | "cxx" | "h" | "hpp" => "cpp",
        "c" => "c",
        "css" => "css",
        "html" | "vue" => "html",
        "json" => "json",
        "md" => "markdown",
        "php" => "php",
        "rb" => "ruby",
        "rs" => "rust",
        "sql" => "sql",
        "swift" => "swift",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "sh" | "bash" => "shell",
        "go" => "go",
        _ => "plaintext",
    }
}
