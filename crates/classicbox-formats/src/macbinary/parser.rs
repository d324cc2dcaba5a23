//! MacBinary reading

use super::crc::crc16;
use super::error::{MacBinaryError, MacBinaryResult};
use super::header::{HEADER_CRC_OFFSET, MACBINARY_HEADER_SCHEMA, MACBINARY_HEADER_SIZE};
use super::{MacBinary, SM_ROMAN};
use crate::record::primitive::read_fixed_bytes;
use crate::record::stream::skip_to_boundary;
use crate::record::{Record, macroman, read_structure};
use std::io::{Cursor, Read};
use tracing::{debug, warn};

const SECTION_BOUNDARY: u64 = MACBINARY_HEADER_SIZE as u64;

/// Read a MacBinary envelope starting at the cursor
///
/// Section alignment is relative to the envelope start, so no seeking is
/// needed. A header CRC mismatch is logged and reported through
/// [`MacBinary::header_crc_matches`] rather than failing.
pub fn read_macbinary<R: Read>(reader: &mut R) -> MacBinaryResult<MacBinary> {
    let mut raw = [0u8; MACBINARY_HEADER_SIZE];
    reader.read_exact(&mut raw)?;
    let mut header = read_structure(&mut Cursor::new(&raw[..]), MACBINARY_HEADER_SCHEMA)?;
    decode_filename(&mut header)?;

    let computed = crc16(&raw[..HEADER_CRC_OFFSET]);
    let stored = header.unsigned("header_crc");
    let crc_matches = stored == Some(u64::from(computed));
    if !crc_matches {
        warn!(
            stored = stored.unwrap_or_default(),
            computed, "MacBinary header CRC mismatch"
        );
    }

    let mut consumed = SECTION_BOUNDARY;
    let data_fork = read_section(reader, &header, "data_fork_length", &mut consumed)?;
    let resource_fork = read_section(reader, &header, "resource_fork_length", &mut consumed)?;
    let comment = read_section(reader, &header, "comment_length", &mut consumed)?;

    debug!(
        filename = header.text("filename").unwrap_or_default(),
        data_fork = data_fork.len(),
        resource_fork = resource_fork.len(),
        comment = comment.len(),
        "read MacBinary"
    );
    Ok(MacBinary::decoded(header, data_fork, resource_fork, comment, crc_matches))
}

/// Replace the raw Pascal filename bytes with decoded text
fn decode_filename(header: &mut Record) -> MacBinaryResult<()> {
    let script = header.unsigned("filename_script").unwrap_or_default();
    if script != u64::from(SM_ROMAN) {
        return Err(MacBinaryError::UnsupportedScript(script));
    }
    let filename = macroman::decode(header.bytes("filename").unwrap_or_default());
    header.set("filename", filename);
    Ok(())
}

fn read_section<R: Read>(
    reader: &mut R,
    header: &Record,
    length_field: &str,
    consumed: &mut u64,
) -> MacBinaryResult<Vec<u8>> {
    let length = header.unsigned(length_field).unwrap_or_default();
    if length == 0 {
        return Ok(Vec::new());
    }
    let section = read_fixed_bytes(reader, length as usize)?;
    *consumed += length;
    *consumed += skip_to_boundary(reader, *consumed, SECTION_BOUNDARY)?;
    Ok(section)
}
