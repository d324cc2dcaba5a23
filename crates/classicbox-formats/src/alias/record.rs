//! Alias record codec
//!
//! The fixed 150-byte header is followed by a variable-length extras list
//! and any trailing bytes. `record_size` covers all of it, so unless the
//! caller supplies a size it is written as zero and patched afterwards.

use super::error::{AliasError, AliasResult};
use super::extra::{EXTRAS_FIELD_TYPE, ExtrasCodec};
use crate::record::stream::Placeholder;
use crate::record::{
    Field, FieldDefault as D, FieldType as T, Record, describe_structure, read_structure_with,
    write_structure_with,
};
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Alias record layout, in encoding order
pub const ALIAS_RECORD_SCHEMA: &[Field] = &[
    Field::new("user_type_name", T::FixedText(4), Some(D::Zero)),
    Field::new("record_size", T::Unsigned(2), None),
    Field::new("record_version", T::Unsigned(2), Some(D::Unsigned(ALIAS_RECORD_VERSION))),
    Field::new("alias_kind", T::Unsigned(2), None),
    Field::new("volume_name", T::PascalString(Some(27)), None),
    Field::new("volume_created", T::Unsigned(4), Some(D::Zero)),
    Field::new("volume_signature", T::FixedText(2), Some(D::Text("BD"))),
    Field::new("drive_type", T::Unsigned(2), Some(D::Zero)),
    Field::new("parent_directory_id", T::Unsigned(4), Some(D::Zero)),
    Field::new("file_name", T::PascalString(Some(63)), None),
    Field::new("file_number", T::Unsigned(4), Some(D::Zero)),
    Field::new("file_created", T::Unsigned(4), Some(D::Zero)),
    Field::new("file_type", T::FixedText(4), Some(D::Zero)),
    Field::new("file_creator", T::FixedText(4), Some(D::Zero)),
    Field::new("nlvl_from", T::Unsigned(2), None),
    Field::new("nlvl_to", T::Unsigned(2), None),
    Field::new("volume_attributes", T::Unsigned(4), Some(D::Zero)),
    Field::new("volume_filesystem_id", T::FixedText(2), Some(D::Zero)),
    Field::new("reserved", T::FixedBytes(10), Some(D::Zero)),
    Field::new("extras", T::Custom(EXTRAS_FIELD_TYPE), Some(D::Zero)),
    Field::new("trailing", T::UntilEnd, Some(D::Zero)),
];

/// Current alias record version
pub const ALIAS_RECORD_VERSION: u64 = 2;

/// Length of the fixed part of an alias record
pub const ALIAS_HEADER_SIZE: usize = 150;

/// Byte offset of `record_size`, just past the user type name
pub const RECORD_SIZE_OFFSET: u64 = 4;

/// `alias_kind` of an alias to a file
pub const ALIAS_KIND_FILE: u16 = 0;
/// `alias_kind` of an alias to a folder or volume
pub const ALIAS_KIND_DIRECTORY: u16 = 1;

/// `nlvl_from`/`nlvl_to` when alias and target live on different volumes
pub const NLVL_DIFFERENT_VOLUME: u16 = 0xFFFF;

/// Decode an alias record, consuming the rest of the stream
pub fn read_alias_record<R: Read>(reader: &mut R) -> AliasResult<Record> {
    let record = read_structure_with(reader, ALIAS_RECORD_SCHEMA, &ExtrasCodec::registry())?;
    debug!(
        record_size = record.unsigned("record_size"),
        extras = record.extras("extras").map_or(0, <[_]>::len),
        "read alias record"
    );
    Ok(record)
}

/// Encode an alias record, returning its encoded size
///
/// When `record_size` is absent it is computed from the bytes actually
/// written and patched in place; the cursor is left at the end of the
/// record either way.
pub fn write_alias_record<W: Write + Seek>(writer: &mut W, record: &Record) -> AliasResult<u64> {
    let codecs = ExtrasCodec::registry();
    let start = writer.stream_position()?;

    if record.contains("record_size") {
        write_structure_with(writer, ALIAS_RECORD_SCHEMA, record, &codecs)?;
        return Ok(writer.stream_position()? - start);
    }

    let mut sized = record.clone();
    sized.set("record_size", 0u16);
    write_structure_with(writer, ALIAS_RECORD_SCHEMA, &sized, &codecs)?;

    let record_size = writer.stream_position()? - start;
    let size_field = u16::try_from(record_size).map_err(|_| AliasError::RecordTooLarge(record_size))?;
    Placeholder::at(start + RECORD_SIZE_OFFSET, 2).fill(writer, &size_field.to_be_bytes())?;
    debug!(record_size, "wrote alias record");
    Ok(record_size)
}

/// Encode an alias record into a fresh buffer
pub fn alias_record_to_bytes(record: &Record) -> AliasResult<Vec<u8>> {
    let mut out = std::io::Cursor::new(Vec::new());
    write_alias_record(&mut out, record)?;
    Ok(out.into_inner())
}

/// Render an alias record for display
pub fn describe_alias_record(record: &Record) -> String {
    describe_structure(record, ALIAS_RECORD_SCHEMA, "Alias Information")
}
