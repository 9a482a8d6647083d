//! Snapshot lifecycle and session invalidation.
//!
//! `Empty → Building → Ready`, with `Ready → Building` on every reselection.
//! There is no cancellation: each rebuild takes the next generation token,
//! and a build whose token is no longer the newest when it completes is
//! discarded (last build wins). Entering `Building` synchronously clears all
//! session state tagged to the previous generation — selected file,
//! displayed content, search query/results, analysis transcript — because
//! those reference content that is about to stop existing.

use crate::builder::{BuildStats, SnapshotBuilder};
use crate::error::{Result, SnapshotError};
use crate::types::Snapshot;
use dirscope_capability::DirectoryHandle;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Empty,
    Building,
    Ready,
}

/// One analysis exchange, kept only for the lifetime of the snapshot
/// generation it was recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub id: u64,
    pub timestamp_unix_ms: u64,
    pub prompt: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// UI-facing state tied to the current snapshot generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub selected_file: Option<String>,
    pub displayed_content: Option<String>,
    pub search_query: String,
    pub search_results: Vec<String>,
    pub transcript: Vec<TranscriptEntry>,
}

impl SessionState {
    fn clear(&mut self) {
        *self = SessionState::default();
    }
}

struct Inner {
    state: LifecycleState,
    current: Option<Arc<Snapshot>>,
    session: SessionState,
    builds_in_flight: usize,
    next_transcript_id: u64,
}

/// Owns the current snapshot and the session state keyed to it.
///
/// The snapshot is swapped, never mutated: a reader either holds the old
/// complete snapshot or the new complete one, never a half-built tree.
pub struct SnapshotLifecycle {
    inner: Mutex<Inner>,
    generations: AtomicU64,
}

impl SnapshotLifecycle {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: LifecycleState::Empty,
                current: None,
                session: SessionState::default(),
                builds_in_flight: 0,
                next_transcript_id: 1,
            }),
            generations: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.lock().current.clone()
    }

    /// Clone of the session state, for rendering.
    pub fn session(&self) -> SessionState {
        self.lock().session.clone()
    }

    /// Rebuild from `root`, replacing the current snapshot on success.
    ///
    /// Clears the session synchronously before the walk starts. On failure
    /// the previous snapshot stays current; a build superseded by a newer
    /// one returns [`SnapshotError::Superseded`] and its result is dropped.
    pub async fn rebuild(&self, root: &dyn DirectoryHandle) -> Result<Arc<Snapshot>> {
        self.rebuild_with_stats(root).await.map(|(snapshot, _)| snapshot)
    }

    pub async fn rebuild_with_stats(
        &self,
        root: &dyn DirectoryHandle,
    ) -> Result<(Arc<Snapshot>, BuildStats)> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut inner = self.lock();
            inner.state = LifecycleState::Building;
            inner.session.clear();
            inner.builds_in_flight += 1;
        }

        let built = SnapshotBuilder::build_with_stats(root, generation).await;

        let mut inner = self.lock();
        inner.builds_in_flight -= 1;
        let result = match built {
            Ok((snapshot, stats)) => {
                if generation == self.generations.load(Ordering::SeqCst) {
                    let snapshot = Arc::new(snapshot);
                    inner.current = Some(Arc::clone(&snapshot));
                    Ok((snapshot, stats))
                } else {
                    log::debug!("discarding superseded build for generation {generation}");
                    Err(SnapshotError::Superseded)
                }
            }
            Err(err) => Err(err),
        };
        inner.state = if inner.builds_in_flight > 0 {
            LifecycleState::Building
        } else if inner.current.is_some() {
            LifecycleState::Ready
        } else {
            LifecycleState::Empty
        };
        result
    }

    /// Select a file for display. Returns the record's content, or `None`
    /// when the path is not a file in the current snapshot.
    pub fn select_file(&self, path: &str) -> Option<String> {
        let mut inner = self.lock();
        let content = inner
            .current
            .as_ref()
            .and_then(|snapshot| snapshot.index.get(path))
            .map(|record| record.content.clone())?;
        inner.session.selected_file = Some(path.to_string());
        inner.session.displayed_content = Some(content.clone());
        Some(content)
    }

    /// Store search results computed against `generation`. Results from a
    /// stale generation are dropped and `false` is returned.
    pub fn record_search(&self, query: &str, generation: u64, paths: Vec<String>) -> bool {
        let mut inner = self.lock();
        let current_generation = inner.current.as_ref().map(|s| s.generation);
        if current_generation != Some(generation) {
            log::debug!("dropping search results for stale generation {generation}");
            return false;
        }
        inner.session.search_query = query.to_string();
        inner.session.search_results = paths;
        true
    }

    /// Append an analysis exchange to the transcript, tagged to the
    /// currently selected file.
    pub fn push_transcript(&self, prompt: impl Into<String>, response: impl Into<String>) -> u64 {
        let mut inner = self.lock();
        let id = inner.next_transcript_id;
        inner.next_transcript_id += 1;
        let file_path = inner.session.selected_file.clone();
        inner.session.transcript.push(TranscriptEntry {
            id,
            timestamp_unix_ms: unix_now_ms(),
            prompt: prompt.into(),
            response: response.into(),
            file_path,
        });
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SnapshotLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
