//! Alias error types

use crate::macbinary::MacBinaryError;
use crate::record::RecordError;
use crate::resource_fork::ResourceForkError;
use crate::volume::VolumeError;
use thiserror::Error;

/// Errors raised while reading, writing or composing aliases
#[derive(Debug, Error)]
pub enum AliasError {
    /// Extras list ran out of input before its end marker
    #[error("extras list ended after {extras_read} entries without an end marker")]
    UnterminatedExtras {
        /// Number of extras decoded before the stream ended
        extras_read: usize,
    },

    /// Encoded record does not fit the 16-bit size field
    #[error("alias record is {0} bytes, larger than its size field can express")]
    RecordTooLarge(u64),

    /// Record codec error
    #[error("record error: {0}")]
    Record(RecordError),

    /// Resource fork error while composing an alias file
    #[error("resource fork error: {0}")]
    ResourceFork(#[from] ResourceForkError),

    /// MacBinary error while composing an alias file
    #[error("MacBinary error: {0}")]
    MacBinary(#[from] MacBinaryError),

    /// Volume error while looking up the target or copying the file in
    #[error("volume error: {0}")]
    Volume(#[from] VolumeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RecordError> for AliasError {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::UnterminatedExtras { extras_read } => Self::UnterminatedExtras { extras_read },
            other => Self::Record(other),
        }
    }
}

/// Result type for alias operations
pub type AliasResult<T> = Result<T, AliasError>;
