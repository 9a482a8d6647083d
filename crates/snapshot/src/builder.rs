//! Recursive snapshot construction.
//!
//! A build is one depth-first async walk over a directory capability. Each
//! directory level returns its node, its subtree's content records, and its
//! tally bottom-up; the root flattens the records into one [`ContentIndex`].
//! No shared mutable map is threaded through the recursion, so the
//! tree/index consistency invariant holds without locks.

use crate::error::{Result, SnapshotError};
use crate::index::ContentIndex;
use crate::reader::{read_outcome, ReadOutcome};
use crate::types::{ContentRecord, DirectoryNode, NodeKind, Snapshot};
use dirscope_capability::{DirectoryHandle, Entry, EntryKind};
use futures::future::BoxFuture;
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Instant;

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BuildStats {
    pub files: usize,
    pub directories: usize,
    /// Subtrees that degraded to empty children because enumeration failed.
    pub degraded_dirs: usize,
    /// Files whose content is the read-error sentinel.
    pub unreadable_files: usize,
    pub duration_ms: u64,
}

impl BuildStats {
    fn absorb(&mut self, other: BuildStats) {
        self.files += other.files;
        self.directories += other.directories;
        self.degraded_dirs += other.degraded_dirs;
        self.unreadable_files += other.unreadable_files;
    }
}

/// Builds immutable snapshots from a directory capability.
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    /// Walk `root` and produce a complete snapshot under `generation`.
    ///
    /// The only fatal error is the root handle failing to enumerate; every
    /// failure below the root degrades locally (empty subtree or sentinel
    /// content) and the build continues.
    pub async fn build(root: &dyn DirectoryHandle, generation: u64) -> Result<Snapshot> {
        Self::build_with_stats(root, generation)
            .await
            .map(|(snapshot, _)| snapshot)
    }

    pub async fn build_with_stats(
        root: &dyn DirectoryHandle,
        generation: u64,
    ) -> Result<(Snapshot, BuildStats)> {
        let start = Instant::now();
        let entries = root
            .entries()
            .await
            .map_err(SnapshotError::RootUnavailable)?;

        let (children, records, mut stats) = walk_entries(root, "", entries).await;
        stats.directories += 1;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "snapshot generation {generation}: {} files, {} directories in {}ms",
            stats.files,
            stats.directories,
            stats.duration_ms
        );

        let tree = DirectoryNode {
            name: root.name().to_string(),
            path: String::new(),
            kind: NodeKind::Directory,
            size: None,
            children: Some(children),
        };
        let snapshot = Snapshot {
            generation,
            root: tree,
            index: ContentIndex::from_records(records),
        };
        Ok((snapshot, stats))
    }
}

/// Process one directory's entry list: files are read under the size policy,
/// subdirectories recurse, and the finished child list is sorted post-order
/// so a consumer never observes a partially-sorted directory.
async fn walk_entries(
    dir: &dyn DirectoryHandle,
    path: &str,
    entries: Vec<Entry>,
) -> (Vec<DirectoryNode>, Vec<ContentRecord>, BuildStats) {
    let mut children = Vec::with_capacity(entries.len());
    let mut records = Vec::new();
    let mut stats = BuildStats::default();

    for entry in entries {
        let child_path = format!("{path}/{name}", name = entry.name);
        match entry.kind {
            EntryKind::Directory => match dir.open_dir(&entry.name).await {
                Ok(sub) => {
                    let (node, sub_records, sub_stats) = walk_dir(sub, entry.name, child_path).await;
                    children.push(node);
                    records.extend(sub_records);
                    stats.absorb(sub_stats);
                }
                Err(err) => {
                    log::warn!("cannot open directory {child_path}: {err}; subtree degraded");
                    stats.directories += 1;
                    stats.degraded_dirs += 1;
                    children.push(empty_directory(entry.name, child_path));
                }
            },
            EntryKind::File => {
                let (size_bytes, outcome) = match dir.open_file(&entry.name).await {
                    Ok(file) => read_outcome(file.as_ref(), &child_path).await,
                    Err(err) => {
                        log::warn!("cannot open file {child_path}: {err}");
                        (0, ReadOutcome::Unreadable)
                    }
                };
                if matches!(outcome, ReadOutcome::Unreadable) {
                    stats.unreadable_files += 1;
                }
                stats.files += 1;

                children.push(DirectoryNode {
                    name: entry.name,
                    path: child_path.clone(),
                    kind: NodeKind::File,
                    size: Some(size_bytes),
                    children: None,
                });
                records.push(ContentRecord::from_outcome(child_path, size_bytes, outcome));
            }
        }
    }

    children.sort_by(compare_siblings);
    (children, records, stats)
}

fn walk_dir(
    dir: Box<dyn DirectoryHandle>,
    name: String,
    path: String,
) -> BoxFuture<'static, (DirectoryNode, Vec<ContentRecord>, BuildStats)> {
    Box::pin(async move {
        match dir.entries().await {
            Ok(entries) => {
                let (children, records, mut stats) =
                    walk_entries(dir.as_ref(), &path, entries).await;
                stats.directories += 1;
                let node = DirectoryNode {
                    name,
                    path,
                    kind: NodeKind::Directory,
                    size: None,
                    children: Some(children),
                };
                (node, records, stats)
            }
            Err(err) => {
                log::warn!("cannot enumerate {path}: {err}; subtree degraded");
                let stats = BuildStats {
                    directories: 1,
                    degraded_dirs: 1,
                    ..BuildStats::default()
                };
                (empty_directory(name, path), Vec::new(), stats)
            }
        }
    })
}

fn empty_directory(name: String, path: String) -> DirectoryNode {
    DirectoryNode {
        name,
        path,
        kind: NodeKind::Directory,
        size: None,
        children: Some(Vec::new()),
    }
}

/// Directories before files, then case-insensitive name order with a
/// case-sensitive tiebreak for determinism.
fn compare_siblings(a: &DirectoryNode, b: &DirectoryNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Directory, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Directory) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}
