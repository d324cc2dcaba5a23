//! Volume access error types

use thiserror::Error;

/// Errors reported by a volume access implementation
#[derive(Debug, Error)]
pub enum VolumeError {
    /// No volume has been mounted yet
    #[error("no volume mounted")]
    NotMounted,

    /// The item at the given path does not exist
    #[error("no such item: {0}")]
    NotFound(String),

    /// The path is not a well-formed absolute Mac path
    #[error("invalid Mac path: {0:?}")]
    InvalidPath(String),

    /// The underlying tool or driver reported a failure
    #[error("volume tool failed: {0}")]
    Tool(String),

    /// I/O error while talking to the volume
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for volume access operations
pub type VolumeResult<T> = Result<T, VolumeError>;
