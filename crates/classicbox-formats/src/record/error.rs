//! Structured record error types

use thiserror::Error;

/// Errors raised by the primitive and structured record codecs
#[derive(Debug, Error)]
pub enum RecordError {
    /// Schema field has neither a supplied value nor a default
    #[error("no value supplied for field \"{0}\", which has no default")]
    MissingRequiredField(String),

    /// Fixed-width value of the wrong length, or Pascal string over its maximum
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Declared size (or maximum for Pascal strings)
        expected: usize,
        /// Size of the supplied value
        actual: usize,
    },

    /// Schema references a custom type tag with no registered codec
    #[error("no codec registered for field type \"{0}\"")]
    UnknownFieldType(String),

    /// Supplied value has the wrong shape for its field type
    #[error("field \"{field}\": expected {expected} value")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Human readable description of the expected value
        expected: &'static str,
    },

    /// Integer does not fit the declared byte width
    #[error("value {value} does not fit in {width} bytes")]
    ValueOutOfRange {
        /// Offending value
        value: i128,
        /// Declared width in bytes
        width: usize,
    },

    /// Character has no MacRoman code point
    #[error("character {0:?} cannot be encoded as MacRoman")]
    UnmappableCharacter(char),

    /// Field has no size known before encoding (dynamic Pascal string, extras, until-end)
    #[error("field \"{0}\" has no static size")]
    UnsizedField(String),

    /// Schema introspection on a field name that does not exist
    #[error("no field named \"{0}\" in schema")]
    UnknownField(String),

    /// Alias extras list ran out of input before its end marker
    #[error("extras list ended after {extras_read} entries without an end marker")]
    UnterminatedExtras {
        /// Number of extras decoded before the stream ended
        extras_read: usize,
    },

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record codec operations
pub type RecordResult<T> = Result<T, RecordError>;
