//! Case-insensitive substring search over the content index.
//!
//! A path matches when the lower-cased query is a substring of its
//! lower-cased path or of its lower-cased content. Results come back in
//! index insertion order — the order files were discovered during the walk —
//! with no relevance ranking. An empty query matches nothing: the UI clears
//! results when the search box is emptied, it does not list everything.

use dirscope_snapshot::{ContentIndex, Snapshot};
use serde::Serialize;
use std::sync::Arc;

/// Paths matching a query, tagged with the generation they were computed
/// against so stale results can be dropped after a rescan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub generation: u64,
    pub query: String,
    pub paths: Vec<String>,
}

/// Search over one snapshot's index.
pub struct SearchEngine {
    snapshot: Arc<Snapshot>,
}

impl SearchEngine {
    pub fn over(snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot }
    }

    pub fn search(&self, query: &str) -> SearchResults {
        let paths = search_index(&self.snapshot.index, query);
        log::debug!(
            "search {query:?} against generation {}: {} hits",
            self.snapshot.generation,
            paths.len()
        );
        SearchResults {
            generation: self.snapshot.generation,
            query: query.to_string(),
            paths,
        }
    }
}

/// Match `query` against every record of `index`, in insertion order.
pub fn search_index(index: &ContentIndex, query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    index
        .iter()
        .filter(|record| {
            record.path.to_lowercase().contains(&needle)
                || record.content.to_lowercase().contains(&needle)
        })
        .map(|record| record.path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirscope_capability::{MemoryDir, MemoryFile};
    use dirscope_snapshot::SnapshotBuilder;
    use pretty_assertions::assert_eq;

    async fn snapshot_of(tree: MemoryDir) -> Arc<Snapshot> {
        Arc::new(SnapshotBuilder::build(&tree, 1).await.unwrap())
    }

    #[tokio::test]
    async fn matches_by_name_and_by_content() {
        let tree = MemoryDir::new("root").with_dir(
            MemoryDir::new("a")
                .with_file(MemoryFile::new("Foo.txt", "bar"))
                .with_file(MemoryFile::new("baz.txt", "contains foo here")),
        );
        let snapshot = snapshot_of(tree).await;
        let engine = SearchEngine::over(Arc::clone(&snapshot));

        let results = engine.search("foo");
        assert_eq!(results.generation, 1);
        assert_eq!(results.paths, vec!["/a/Foo.txt", "/a/baz.txt"]);
    }

    #[tokio::test]
    async fn empty_query_matches_nothing() {
        let tree = MemoryDir::new("root").with_file(MemoryFile::new("a.txt", "anything"));
        let snapshot = snapshot_of(tree).await;

        assert!(search_index(&snapshot.index, "").is_empty());
    }

    #[tokio::test]
    async fn query_case_is_ignored() {
        let tree = MemoryDir::new("root").with_file(MemoryFile::new("Notes.md", "Remember THE milk"));
        let snapshot = snapshot_of(tree).await;

        assert_eq!(
            search_index(&snapshot.index, "the milk"),
            vec!["/Notes.md"]
        );
        assert_eq!(search_index(&snapshot.index, "NOTES"), vec!["/Notes.md"]);
    }

    #[tokio::test]
    async fn results_keep_discovery_order() {
        let tree = MemoryDir::new("root")
            .with_file(MemoryFile::new("zz.txt", "needle"))
            .with_file(MemoryFile::new("aa.txt", "needle"));
        let snapshot = snapshot_of(tree).await;

        // Discovery order, not sorted order.
        assert_eq!(
            search_index(&snapshot.index, "needle"),
            vec!["/zz.txt", "/aa.txt"]
        );
    }

    #[tokio::test]
    async fn no_hits_yields_empty() {
        let tree = MemoryDir::new("root").with_file(MemoryFile::new("a.txt", "alpha"));
        let snapshot = snapshot_of(tree).await;

        assert!(search_index(&snapshot.index, "zzz").is_empty());
    }
}
