//! Policy-directed file reading.
//!
//! [`read_file`] never returns an error: opening or decoding can fail at any
//! point (permission revoked mid-scan, binary content, IO error) and every
//! failure degrades to a sentinel record so a single unreadable file never
//! aborts the surrounding traversal.

use crate::policy::{classify, ReadAction};
use crate::types::{detect_language, ContentRecord};
use dirscope_capability::FileHandle;

/// Appended verbatim to preview content. The `truncated` flag is the
/// canonical signal; the marker exists so string-only consumers can still
/// detect truncation by suffix match.
pub const TRUNCATION_MARKER: &str = "\n\n[... File truncated for performance reasons ...]";

/// Record content when a file could not be read or decoded.
pub const READ_ERROR_SENTINEL: &str = "Error reading file content";

/// Placeholder content for files over the hard limit; their bytes are never
/// read.
pub fn too_large_placeholder(size_bytes: u64) -> String {
    format!(
        "File is too large ({}). For performance reasons, files larger than 5MB are not fully loaded.",
        human_size_mb(size_bytes)
    )
}

fn human_size_mb(size_bytes: u64) -> String {
    format!("{:.2}MB", size_bytes as f64 / 1024.0 / 1024.0)
}

/// Tagged result of reading one file under the size policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Full(String),
    Truncated(String),
    TooLarge(u64),
    Unreadable,
}

impl ReadOutcome {
    fn into_parts(self) -> (String, bool, bool) {
        match self {
            ReadOutcome::Full(text) => (text, false, false),
            ReadOutcome::Truncated(prefix) => {
                (format!("{prefix}{TRUNCATION_MARKER}"), true, false)
            }
            ReadOutcome::TooLarge(size) => (too_large_placeholder(size), false, true),
            ReadOutcome::Unreadable => (READ_ERROR_SENTINEL.to_string(), false, false),
        }
    }
}

impl ContentRecord {
    pub(crate) fn from_outcome(path: String, size_bytes: u64, outcome: ReadOutcome) -> Self {
        let name = path.rsplit('/').next().unwrap_or(&path);
        let language = detect_language(name);
        let (content, truncated, too_large) = outcome.into_parts();
        Self {
            path,
            content,
            size_bytes,
            truncated,
            too_large,
            language,
        }
    }
}

/// Read one file into a [`ContentRecord`] under the size policy.
pub async fn read_file(file: &dyn FileHandle, path: &str) -> ContentRecord {
    let (size_bytes, outcome) = read_outcome(file, path).await;
    ContentRecord::from_outcome(path.to_string(), size_bytes, outcome)
}

/// Like [`read_file`] but returns the raw tagged outcome together with the
/// observed size, for callers that branch on the tag (the builder's stats).
pub async fn read_outcome(file: &dyn FileHandle, path: &str) -> (u64, ReadOutcome) {
    let size_bytes = match file.size().await {
        Ok(size) => size,
        Err(err) => {
            log::warn!("failed to stat {path}: {err}");
            return (0, ReadOutcome::Unreadable);
        }
    };

    let outcome = match classify(size_bytes) {
        ReadAction::Skip => ReadOutcome::TooLarge(size_bytes),
        ReadAction::Preview { preview_bytes } => match file.read_prefix(preview_bytes).await {
            Ok(prefix) => ReadOutcome::Truncated(prefix),
            Err(err) => {
                log::warn!("failed to read preview of {path}: {err}");
                ReadOutcome::Unreadable
            }
        },
        ReadAction::Full => match file.read_text().await {
            Ok(text) => ReadOutcome::Full(text),
            Err(err) => {
                log::warn!("failed to read {path}: {err}");
                ReadOutcome::Unreadable
            }
        },
    };

    (size_bytes, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{HARD_LIMIT, PREVIEW_LIMIT};
    use dirscope_capability::MemoryFile;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn small_file_reads_in_full() {
        let file = MemoryFile::new("main.rs", "fn main() {}");
        let record = read_file(&file, "/src/main.rs").await;

        assert_eq!(record.content, "fn main() {}");
        assert_eq!(record.size_bytes, 12);
        assert!(!record.truncated);
        assert!(!record.too_large);
        assert_eq!(record.language, "rust");
    }

    #[tokio::test]
    async fn preview_is_exactly_the_limit_plus_marker() {
        // Content longer than the preview window, size in the preview band.
        let content = "a".repeat(PREVIEW_LIMIT + 500);
        let file = MemoryFile::new("big.txt", content).with_reported_size(HARD_LIMIT);
        let record = read_file(&file, "/big.txt").await;

        assert_eq!(
            record.content.len(),
            PREVIEW_LIMIT + TRUNCATION_MARKER.len()
        );
        assert!(record.content.ends_with(TRUNCATION_MARKER));
        assert!(record.truncated);
        assert!(!record.too_large);
    }

    #[tokio::test]
    async fn oversized_file_is_never_read() {
        let file = MemoryFile::new("huge.bin", "x").with_reported_size(HARD_LIMIT + 1);
        let reads = file.read_counter();
        let record = read_file(&file, "/huge.bin").await;

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(record.too_large);
        assert!(!record.truncated);
        assert_eq!(record.content, too_large_placeholder(HARD_LIMIT + 1));
        assert!(record.content.contains("5.00MB"));
    }

    #[tokio::test]
    async fn read_failure_degrades_to_sentinel() {
        let file = MemoryFile::new("secret.txt", "hidden").unreadable();
        let record = read_file(&file, "/secret.txt").await;

        assert_eq!(record.content, READ_ERROR_SENTINEL);
        assert!(!record.truncated);
        assert!(!record.too_large);
        assert_eq!(record.size_bytes, 6);
    }

    #[tokio::test]
    async fn binary_content_degrades_to_sentinel() {
        let file = MemoryFile::new("blob.bin", vec![0xff, 0xfe, 0x01]);
        let record = read_file(&file, "/blob.bin").await;

        assert_eq!(record.content, READ_ERROR_SENTINEL);
    }
}
