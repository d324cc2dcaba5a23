use super::error::{RecordError, RecordResult};
use super::primitive::{
    read_fixed_bytes, read_fixed_text, read_pascal_bytes, read_pascal_string, read_signed,
    read_unsigned, read_until_end, write_fixed_bytes, write_fixed_text, write_pascal_bytes,
    write_pascal_string, write_signed, write_unsigned, write_zeros,
};
use super::{Field, FieldType, Record, Value, macroman};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::io::{Read, Write};
use tracing::trace;

/// Decoder/encoder pair for a format-specific field type
pub trait FieldCodec: Send + Sync {
    /// Decode one field value
    fn read(&self, reader: &mut dyn Read, field: &Field) -> RecordResult<Value>;

    /// Encode one field value
    fn write(&self, writer: &mut dyn Write, field: &Field, value: &Value) -> RecordResult<()>;
}

/// Registry of custom field codecs keyed by type tag
#[derive(Default)]
pub struct FieldCodecs {
    codecs: HashMap<&'static str, Box<dyn FieldCodec>>,
}

impl FieldCodecs {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec for `tag`, replacing any previous one
    pub fn register(mut self, tag: &'static str, codec: impl FieldCodec + 'static) -> Self {
        self.codecs.insert(tag, Box::new(codec));
        self
    }

    /// Look up the codec for `tag`
    pub fn get(&self, tag: &str) -> Option<&dyn FieldCodec> {
        self.codecs.get(tag).map(AsRef::as_ref)
    }
}

impl fmt::Debug for FieldCodecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.codecs.keys()).finish()
    }
}

/// Decode a record by walking `schema` in order
pub fn read_structure<R: Read>(reader: &mut R, schema: &[Field]) -> RecordResult<Record> {
    read_structure_with(reader, schema, &FieldCodecs::new())
}

/// Decode a record, resolving custom field types through `codecs`
pub fn read_structure_with<R: Read>(
    reader: &mut R,
    schema: &[Field],
    codecs: &FieldCodecs,
) -> RecordResult<Record> {
    let mut record = Record::new();
    for field in schema {
        let value = read_field(reader, field, codecs)?;
        trace!(field = field.name, value = %value, "decoded field");
        record.set(field.name, value);
    }
    Ok(record)
}

fn read_field<R: Read>(reader: &mut R, field: &Field, codecs: &FieldCodecs) -> RecordResult<Value> {
    Ok(match field.field_type {
        FieldType::FixedBytes(n) => Value::Bytes(read_fixed_bytes(reader, n)?),
        FieldType::FixedText(n) => Value::Text(read_fixed_text(reader, n)?),
        FieldType::Unsigned(n) => Value::Unsigned(read_unsigned(reader, n)?),
        FieldType::Signed(n) => Value::Signed(read_signed(reader, n)?),
        FieldType::PascalString(max) => Value::Text(read_pascal_string(reader, max)?),
        FieldType::PascalBytes(max) => Value::Bytes(read_pascal_bytes(reader, max)?),
        FieldType::UntilEnd => Value::Bytes(read_until_end(reader)?),
        FieldType::Custom(tag) => codecs
            .get(tag)
            .ok_or_else(|| RecordError::UnknownFieldType(tag.to_string()))?
            .read(reader, field)?,
    })
}

/// Encode `record` by walking `schema` in order
pub fn write_structure<W: Write>(writer: &mut W, schema: &[Field], record: &Record) -> RecordResult<()> {
    write_structure_with(writer, schema, record, &FieldCodecs::new())
}

/// Encode `record`, resolving custom field types through `codecs`
///
/// Fields missing from `record` fall back to the schema default. A field
/// with neither fails with [`RecordError::MissingRequiredField`].
pub fn write_structure_with<W: Write>(
    writer: &mut W,
    schema: &[Field],
    record: &Record,
    codecs: &FieldCodecs,
) -> RecordResult<()> {
    for field in schema {
        let default;
        let value = match record.get(field.name) {
            Some(value) => value,
            None => {
                default = field
                    .default
                    .ok_or_else(|| RecordError::MissingRequiredField(field.name.to_string()))?
                    .to_value(field.field_type);
                &default
            }
        };
        trace!(field = field.name, value = %value, "encoding field");
        write_field(writer, field, value, codecs)?;
    }
    Ok(())
}

fn mismatch(field: &Field, expected: &'static str) -> RecordError {
    RecordError::TypeMismatch {
        field: field.name.to_string(),
        expected,
    }
}

fn write_field<W: Write>(
    writer: &mut W,
    field: &Field,
    value: &Value,
    codecs: &FieldCodecs,
) -> RecordResult<()> {
    match (field.field_type, value) {
        (FieldType::FixedBytes(n) | FieldType::FixedText(n), Value::Bytes(bytes)) => {
            write_fixed_bytes(writer, n, bytes)
        }
        (FieldType::FixedBytes(n) | FieldType::FixedText(n), Value::Text(text)) => {
            write_fixed_text(writer, n, text)
        }
        (
            FieldType::FixedBytes(n) | FieldType::FixedText(n),
            Value::Unsigned(0) | Value::Signed(0),
        ) => Ok(write_zeros(writer, n)?),
        (FieldType::FixedBytes(_) | FieldType::FixedText(_), _) => Err(mismatch(field, "byte or text")),
        (FieldType::Unsigned(n), value) => {
            let v = value.as_integer().ok_or_else(|| mismatch(field, "integer"))?;
            let v = u64::try_from(v).map_err(|_| RecordError::ValueOutOfRange { value: v, width: n })?;
            write_unsigned(writer, n, v)
        }
        (FieldType::Signed(n), value) => {
            let v = value.as_integer().ok_or_else(|| mismatch(field, "integer"))?;
            let v = i64::try_from(v).map_err(|_| RecordError::ValueOutOfRange { value: v, width: n })?;
            write_signed(writer, n, v)
        }
        (FieldType::PascalString(max) | FieldType::PascalBytes(max), Value::Text(text)) => {
            write_pascal_string(writer, max, text)
        }
        (FieldType::PascalString(max) | FieldType::PascalBytes(max), Value::Bytes(bytes)) => {
            write_pascal_bytes(writer, max, bytes)
        }
        (FieldType::PascalString(_) | FieldType::PascalBytes(_), _) => Err(mismatch(field, "text")),
        (FieldType::UntilEnd, Value::Bytes(bytes)) => Ok(writer.write_all(bytes)?),
        (FieldType::UntilEnd, Value::Text(text)) => Ok(writer.write_all(&macroman::encode(text)?)?),
        (FieldType::UntilEnd, _) => Err(mismatch(field, "byte")),
        (FieldType::Custom(tag), value) => codecs
            .get(tag)
            .ok_or_else(|| RecordError::UnknownFieldType(tag.to_string()))?
            .write(writer, field, value),
    }
}

/// Encoded size of a fixed-size field
pub fn sizeof_field(field: &Field) -> RecordResult<usize> {
    match field.field_type {
        FieldType::FixedBytes(n)
        | FieldType::FixedText(n)
        | FieldType::Unsigned(n)
        | FieldType::Signed(n) => Ok(n),
        FieldType::PascalString(Some(max)) | FieldType::PascalBytes(Some(max)) => Ok(max + 1),
        _ => Err(RecordError::UnsizedField(field.name.to_string())),
    }
}

/// Encoded size of a schema made only of fixed-size fields
pub fn sizeof_structure(schema: &[Field]) -> RecordResult<usize> {
    schema.iter().map(sizeof_field).sum()
}

/// Byte offset of the field `name` from the start of the structure
pub fn offset_of_field(schema: &[Field], name: &str) -> RecordResult<usize> {
    let mut offset = 0;
    for field in schema {
        if field.name == name {
            return Ok(offset);
        }
        offset += sizeof_field(field)?;
    }
    Err(RecordError::UnknownField(name.to_string()))
}

/// Render `record` in schema order under an underlined title
pub fn describe_structure(record: &Record, schema: &[Field], title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    for field in schema {
        match record.get(field.name) {
            Some(value) => {
                let _ = writeln!(out, "{}: {value}", field.name);
            }
            None => {
                let _ = writeln!(out, "{}: <missing>", field.name);
            }
        }
    }
    out
}
