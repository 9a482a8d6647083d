use dirscope_capability::CapabilityError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The root handle itself is invalid or revoked. The only fatal build
    /// error — everything below the root degrades locally instead.
    #[error("root directory unavailable: {0}")]
    RootUnavailable(#[source] CapabilityError),

    /// A newer rebuild was started while this one was in flight; its result
    /// has been discarded (last build wins).
    #[error("build superseded by a newer rebuild")]
    Superseded,
}
