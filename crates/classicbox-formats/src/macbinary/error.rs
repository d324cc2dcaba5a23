//! MacBinary error types

use crate::record::RecordError;
use thiserror::Error;

/// Errors that can occur when reading or writing MacBinary envelopes
#[derive(Debug, Error)]
pub enum MacBinaryError {
    /// Neither a data fork nor a resource fork was supplied
    #[error("must explicitly specify a data fork, a resource fork, or both")]
    NoForkSpecified,

    /// Filename is in a script other than Roman
    #[error("filename script {0} is not supported, only Roman (0) is")]
    UnsupportedScript(u64),

    /// A section is longer than its length field can express
    #[error("{section} is {length} bytes, too long for its length field")]
    SectionTooLarge {
        /// Which section
        section: &'static str,
        /// Actual length
        length: usize,
    },

    /// Header encoding or decoding failed
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MacBinary operations
pub type MacBinaryResult<T> = Result<T, MacBinaryError>;
