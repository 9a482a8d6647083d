use thiserror::Error;

pub type Result<T> = std::result::Result<T, CapabilityError>;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no such entry: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("access denied: {0}")]
    Denied(String),

    #[error("not valid UTF-8: {0}")]
    NotUtf8(String),
}
