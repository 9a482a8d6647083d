//! # Dirscope Snapshot
//!
//! Directory snapshot & content-indexing engine.
//!
//! ## Pipeline
//!
//! ```text
//! Directory capability
//!     │
//!     ├──> SnapshotBuilder (recursive async walk)
//!     │      ├─> DirectoryNode tree (sorted, immutable)
//!     │      └─> ContentIndex (flat, discovery order)
//!     │
//!     └──> SnapshotLifecycle (generation tokens, session invalidation)
//! ```
//!
//! A [`Snapshot`] is built in one pass and never mutated afterwards: a rescan
//! produces a whole new snapshot under the next generation token and swaps it
//! in, so readers either see the old complete tree or the new complete one.
//!
//! ## Example
//!
//! ```no_run
//! use dirscope_capability::FsDirectory;
//! use dirscope_snapshot::SnapshotLifecycle;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let root = FsDirectory::open_root("/path/to/project").await?;
//!     let lifecycle = SnapshotLifecycle::new();
//!     let snapshot = lifecycle.rebuild(&root).await?;
//!
//!     println!("indexed {} files", snapshot.index.len());
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod index;
mod lifecycle;
mod policy;
mod reader;
mod types;

pub use builder::{BuildStats, SnapshotBuilder};
pub use error::{Result, SnapshotError};
pub use index::ContentIndex;
pub use lifecycle::{LifecycleState, SessionState, SnapshotLifecycle, TranscriptEntry};
pub use policy::{classify, ReadAction, HARD_LIMIT, PREVIEW_LIMIT, PREVIEW_THRESHOLD};
pub use reader::{
    read_file, read_outcome, too_large_placeholder, ReadOutcome, READ_ERROR_SENTINEL,
    TRUNCATION_MARKER,
};
pub use types::{detect_language, ContentRecord, DirectoryNode, NodeKind, Snapshot};
