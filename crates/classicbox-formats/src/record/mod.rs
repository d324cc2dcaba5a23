//! Schema-driven structured records
//!
//! Every fixed header in the classic Mac formats is an ordered list of
//! fields: big-endian integers, fixed byte or text runs, Pascal strings.
//! A [`Field`] names one of them together with its [`FieldType`] and an
//! optional default. [`read_structure`] walks a schema and produces a
//! [`Record`]; [`write_structure`] walks the same schema and encodes a
//! (possibly partial) record, falling back to defaults for missing fields.
//!
//! Format-specific field types plug in through [`FieldCodecs`], keyed by the
//! tag carried in [`FieldType::Custom`].
//!
//! ```rust
//! use classicbox_formats::record::{Field, FieldDefault, FieldType, Record, read_structure, write_structure};
//! use std::io::Cursor;
//!
//! const SCHEMA: &[Field] = &[
//!     Field::new("kind", FieldType::Unsigned(2), None),
//!     Field::new("name", FieldType::PascalString(Some(7)), Some(FieldDefault::Text("untitled"))),
//! ];
//!
//! let mut out = Cursor::new(Vec::new());
//! write_structure(&mut out, SCHEMA, &Record::new().with("kind", 1u16))?;
//! assert_eq!(out.get_ref().len(), 10);
//!
//! out.set_position(0);
//! let record = read_structure(&mut out, SCHEMA)?;
//! assert_eq!(record.text("name"), Some("untitled"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
pub mod error;
pub mod macroman;
pub mod primitive;
pub mod stream;

pub use codec::{
    FieldCodec, FieldCodecs, describe_structure, offset_of_field, read_structure,
    read_structure_with, sizeof_field, sizeof_structure, write_structure, write_structure_with,
};
pub use error::{RecordError, RecordResult};

use crate::alias::Extra;
use std::collections::HashMap;
use std::fmt;

/// Type tag and size of one schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Exactly N raw bytes
    FixedBytes(usize),
    /// Exactly N bytes decoded as MacRoman text
    FixedText(usize),
    /// Unsigned big-endian integer of N bytes
    Unsigned(usize),
    /// Two's-complement big-endian integer of N bytes
    Signed(usize),
    /// Pascal string decoded as MacRoman, padded to the maximum if one is given
    PascalString(Option<usize>),
    /// Pascal string left as raw bytes
    PascalBytes(Option<usize>),
    /// Everything left in the stream
    UntilEnd,
    /// Format-specific type resolved through [`FieldCodecs`]
    Custom(&'static str),
}

impl FieldType {
    /// Type tag used in diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FixedBytes(_) => "fixed-bytes",
            Self::FixedText(_) => "fixed-text",
            Self::Unsigned(_) => "unsigned",
            Self::Signed(_) => "signed",
            Self::PascalString(_) => "pascal-string",
            Self::PascalBytes(_) => "pascal-bytes",
            Self::UntilEnd => "until-end",
            Self::Custom(tag) => tag,
        }
    }
}

/// Default value of a schema field
///
/// Kept separate from [`Value`] so schemas can live in `const` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// All-zero bytes for fixed fields, 0 for integers, empty otherwise
    Zero,
    /// Integer default
    Unsigned(u64),
    /// Text default
    Text(&'static str),
    /// Raw byte default
    Bytes(&'static [u8]),
}

impl FieldDefault {
    /// Materialize the default for a field of the given type
    pub fn to_value(self, field_type: FieldType) -> Value {
        match (self, field_type) {
            (Self::Zero, FieldType::FixedBytes(n) | FieldType::FixedText(n)) => {
                Value::Bytes(vec![0; n])
            }
            (Self::Zero, FieldType::Signed(_)) => Value::Signed(0),
            (Self::Zero, FieldType::Unsigned(_)) => Value::Unsigned(0),
            (Self::Zero, FieldType::PascalString(_)) => Value::Text(String::new()),
            (Self::Zero, FieldType::Custom(_)) => Value::Extras(Vec::new()),
            (Self::Zero, _) => Value::Bytes(Vec::new()),
            (Self::Unsigned(v), FieldType::Signed(_)) => Value::Signed(v as i64),
            (Self::Unsigned(v), _) => Value::Unsigned(v),
            (Self::Text(text), _) => Value::Text(text.to_string()),
            (Self::Bytes(bytes), _) => Value::Bytes(bytes.to_vec()),
        }
    }
}

/// One named, typed schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, also the key in a [`Record`]
    pub name: &'static str,
    /// Type tag and size
    pub field_type: FieldType,
    /// Value used when a record being written does not supply one
    pub default: Option<FieldDefault>,
}

impl Field {
    /// Create a schema field
    pub const fn new(name: &'static str, field_type: FieldType, default: Option<FieldDefault>) -> Self {
        Self {
            name,
            field_type,
            default,
        }
    }
}

/// A decoded or to-be-encoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer
    Unsigned(u64),
    /// Signed integer
    Signed(i64),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Text (MacRoman on the wire)
    Text(String),
    /// Alias record extras list
    Extras(Vec<Extra>),
}

impl Value {
    /// Integer view of the value, accepting either signedness
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Unsigned(v) => Some(i128::from(*v)),
            Self::Signed(v) => Some(i128::from(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Extras(extras) => {
                write!(f, "[")?;
                for (i, extra) in extras.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{extra}")?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! value_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Unsigned(u64::from(v))
            }
        })*
    };
}

macro_rules! value_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Signed(i64::from(v))
            }
        })*
    };
}

value_from_unsigned!(u8, u16, u32, u64);
value_from_signed!(i8, i16, i32, i64);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Extra>> for Value {
    fn from(v: Vec<Extra>) -> Self {
        Self::Extras(v)
    }
}

/// Name to value mapping produced by decoding or supplied for encoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace a field value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a field value, returning it
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Look up a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the record carries a value for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Unsigned integer field, if present with that shape
    pub fn unsigned(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            Value::Unsigned(v) => Some(*v),
            Value::Signed(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Signed integer field, if present with that shape
    pub fn signed(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Signed(v) => Some(*v),
            Value::Unsigned(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Text field, if present with that shape
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw byte field, if present with that shape
    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        match self.get(name)? {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Extras field, if present with that shape
    pub fn extras(&self, name: &str) -> Option<&[Extra]> {
        match self.get(name)? {
            Value::Extras(extras) => Some(extras),
            _ => None,
        }
    }

    /// Number of fields carried
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record carries no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all fields in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let record = Record::new()
            .with("id", -3i16)
            .with("size", 12u32)
            .with("name", "Boot")
            .with("raw", vec![1u8, 2]);

        assert_eq!(record.signed("id"), Some(-3));
        assert_eq!(record.unsigned("id"), None);
        assert_eq!(record.unsigned("size"), Some(12));
        assert_eq!(record.text("name"), Some("Boot"));
        assert_eq!(record.bytes("raw"), Some(&[1u8, 2][..]));
        assert_eq!(record.text("missing"), None);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_default_materialization() {
        assert_eq!(
            FieldDefault::Zero.to_value(FieldType::FixedText(4)),
            Value::Bytes(vec![0; 4])
        );
        assert_eq!(
            FieldDefault::Unsigned(2).to_value(FieldType::Unsigned(2)),
            Value::Unsigned(2)
        );
        assert_eq!(
            FieldDefault::Text("BD").to_value(FieldType::FixedText(2)),
            Value::Text("BD".to_string())
        );
        assert_eq!(
            FieldDefault::Zero.to_value(FieldType::Custom("extras")),
            Value::Extras(Vec::new())
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Bytes(vec![0xAB, 0x01]).to_string(), "0xab01");
        assert_eq!(Value::Text("app".into()).to_string(), "\"app\"");
        assert_eq!(Value::Signed(-1).to_string(), "-1");
    }
}
