//! Size-based content policy.
//!
//! Pure classification of how a file's content is loaded. Thresholds are
//! fixed for compatibility with existing indexes and must not drift.

/// Files above this are never read; a placeholder stands in for content.
pub const HARD_LIMIT: u64 = 5 * 1024 * 1024;

/// Files above this (and up to [`HARD_LIMIT`]) get a prefix-only preview.
pub const PREVIEW_THRESHOLD: u64 = HARD_LIMIT / 2;

/// Bytes of content read for a preview.
pub const PREVIEW_LIMIT: usize = 100_000;

/// How a file of a given size is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    /// Read the entire file.
    Full,
    /// Read only the first `preview_bytes` bytes.
    Preview { preview_bytes: usize },
    /// Do not read the file at all.
    Skip,
}

/// Classify a file's handling by byte size. Total over all inputs.
pub fn classify(size_bytes: u64) -> ReadAction {
    if size_bytes > HARD_LIMIT {
        ReadAction::Skip
    } else if size_bytes > PREVIEW_THRESHOLD {
        ReadAction::Preview {
            preview_bytes: PREVIEW_LIMIT,
        }
    } else {
        ReadAction::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn small_files_read_in_full() {
        assert_eq!(classify(0), ReadAction::Full);
        assert_eq!(classify(1024), ReadAction::Full);
        assert_eq!(classify(PREVIEW_THRESHOLD), ReadAction::Full);
    }

    #[test]
    fn mid_range_files_get_a_preview() {
        assert_eq!(
            classify(PREVIEW_THRESHOLD + 1),
            ReadAction::Preview {
                preview_bytes: PREVIEW_LIMIT
            }
        );
        assert_eq!(
            classify(HARD_LIMIT),
            ReadAction::Preview {
                preview_bytes: PREVIEW_LIMIT
            }
        );
    }

    #[test]
    fn oversized_files_are_skipped() {
        assert_eq!(classify(HARD_LIMIT + 1), ReadAction::Skip);
        assert_eq!(classify(u64::MAX), ReadAction::Skip);
    }

    #[test]
    fn thresholds_are_bit_exact() {
        assert_eq!(HARD_LIMIT, 5_242_880);
        assert_eq!(PREVIEW_THRESHOLD, 2_621_440);
        assert_eq!(PREVIEW_LIMIT, 100_000);
    }
}
