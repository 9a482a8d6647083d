//! # Dirscope Search
//!
//! Substring search over a snapshot's content index.

mod engine;

pub use engine::{search_index, SearchEngine, SearchResults};
