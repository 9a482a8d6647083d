//! Flat content index: path → record, in discovery order.

use crate::types::ContentRecord;
use std::collections::HashMap;

/// Insertion-ordered mapping from file path to [`ContentRecord`].
///
/// Built once per snapshot as a byproduct of the tree walk and read-only
/// afterwards. Iteration yields records in the order files were discovered
/// during traversal, which is the order search results are reported in.
#[derive(Debug, Default)]
pub struct ContentIndex {
    records: Vec<ContentRecord>,
    by_path: HashMap<String, usize>,
}

impl ContentIndex {
    pub(crate) fn from_records(records: Vec<ContentRecord>) -> Self {
        let mut by_path = HashMap::with_capacity(records.len());
        for (offset, record) in records.iter().enumerate() {
            let previous = by_path.insert(record.path.clone(), offset);
            debug_assert!(previous.is_none(), "duplicate record for {}", record.path);
        }
        Self { records, by_path }
    }

    pub fn get(&self, path: &str) -> Option<&ContentRecord> {
        self.by_path.get(path).map(|&offset| &self.records[offset])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// Records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ReadOutcome;
    use pretty_assertions::assert_eq;

    fn record(path: &str, content: &str) -> ContentRecord {
        ContentRecord::from_outcome(
            path.to_string(),
            content.len() as u64,
            ReadOutcome::Full(content.to_string()),
        )
    }

    #[test]
    fn lookup_and_order() {
        let index = ContentIndex::from_records(vec![
            record("/b.txt", "bee"),
            record("/a/deep.txt", "deep"),
            record("/a.txt", "ay"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("/a/deep.txt").unwrap().content, "deep");
        assert!(index.get("/missing.txt").is_none());

        let paths: Vec<&str> = index.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/b.txt", "/a/deep.txt", "/a.txt"]);
    }

    #[test]
    fn empty_index() {
        let index = ContentIndex::default();
        assert!(index.is_empty());
        assert!(!index.contains("/x"));
    }
}
