//! Error types for resource fork parsing and building

use crate::record::RecordError;
use thiserror::Error;

/// Errors that can occur when reading or writing resource forks
#[derive(Debug, Error)]
pub enum ResourceForkError {
    /// A resource type with no resources cannot be encoded
    #[error("resource type '{0}' has no resources and must be removed before writing")]
    EmptyResourceType(String),

    /// A resource map with no types cannot be encoded
    #[error("resource map has no resource types")]
    EmptyResourceMap,

    /// A resource lacks a field needed for writing (name or data not loaded)
    #[error("resource '{code}' {id} has no {field}")]
    MissingField {
        /// Type code of the resource
        code: String,
        /// Resource ID
        id: i16,
        /// Missing field name
        field: &'static str,
    },

    /// A computed offset or count does not fit its on-disk field
    #[error("{what} of {value} does not fit in its field")]
    OffsetOverflow {
        /// Which quantity overflowed
        what: &'static str,
        /// Computed value
        value: u64,
    },

    /// Name encoding or decoding failed
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing/writing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for resource fork operations
pub type ResourceForkResult<T> = Result<T, ResourceForkError>;
