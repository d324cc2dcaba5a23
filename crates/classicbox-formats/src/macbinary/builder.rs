//! MacBinary writing

use super::crc::crc16;
use super::error::{MacBinaryError, MacBinaryResult};
use super::header::{HEADER_CRC_OFFSET, MACBINARY_HEADER_SCHEMA, MACBINARY_HEADER_SIZE};
use super::{MacBinary, SM_ROMAN};
use crate::record::stream::{pad_to_boundary, patch_at};
use crate::record::write_structure;
use crate::time::mac_timestamp_now;
use std::io::{Cursor, Write};
use tracing::debug;

const SECTION_BOUNDARY: u64 = MACBINARY_HEADER_SIZE as u64;

fn section_length(section: &'static str, bytes: &[u8], max: u64) -> MacBinaryResult<u64> {
    let length = bytes.len() as u64;
    if length > max {
        return Err(MacBinaryError::SectionTooLarge {
            section,
            length: bytes.len(),
        });
    }
    Ok(length)
}

/// Encode the 128-byte header with derived lengths, dates and CRC
pub fn encode_macbinary_header(macbinary: &MacBinary) -> MacBinaryResult<Vec<u8>> {
    let mut header = macbinary.header.clone();

    let script = header.unsigned("filename_script").unwrap_or_default();
    if script != u64::from(SM_ROMAN) {
        return Err(MacBinaryError::UnsupportedScript(script));
    }

    let data_fork = macbinary.data_fork.as_deref().unwrap_or_default();
    let resource_fork = macbinary.resource_fork.as_deref().unwrap_or_default();
    header.set("data_fork_length", section_length("data fork", data_fork, u64::from(u32::MAX))?);
    header.set(
        "resource_fork_length",
        section_length("resource fork", resource_fork, u64::from(u32::MAX))?,
    );
    header.set(
        "comment_length",
        section_length("comment", &macbinary.comment, u64::from(u16::MAX))?,
    );

    if !header.contains("created") || !header.contains("modified") {
        let now = mac_timestamp_now();
        for field in ["created", "modified"] {
            if !header.contains(field) {
                header.set(field, now);
            }
        }
    }

    header.set("header_crc", 0u16);
    let mut out = Cursor::new(Vec::with_capacity(MACBINARY_HEADER_SIZE));
    write_structure(&mut out, MACBINARY_HEADER_SCHEMA, &header)?;

    let crc = crc16(&out.get_ref()[..HEADER_CRC_OFFSET]);
    patch_at(&mut out, HEADER_CRC_OFFSET as u64, &crc.to_be_bytes())?;
    debug!(crc, "encoded MacBinary header");
    Ok(out.into_inner())
}

/// Write a MacBinary envelope, returning the number of bytes written
///
/// At least one of the data and resource forks must be supplied, even if
/// empty. Missing `created`/`modified` dates default to now.
pub fn write_macbinary<W: Write>(writer: &mut W, macbinary: &MacBinary) -> MacBinaryResult<u64> {
    if macbinary.data_fork.is_none() && macbinary.resource_fork.is_none() {
        return Err(MacBinaryError::NoForkSpecified);
    }

    let header = encode_macbinary_header(macbinary)?;
    writer.write_all(&header)?;

    let mut written = header.len() as u64;
    for section in [
        macbinary.data_fork.as_deref().unwrap_or_default(),
        macbinary.resource_fork.as_deref().unwrap_or_default(),
        macbinary.comment.as_slice(),
    ] {
        if section.is_empty() {
            continue;
        }
        writer.write_all(section)?;
        written += section.len() as u64;
        written += pad_to_boundary(writer, written, SECTION_BOUNDARY)?;
    }

    debug!(bytes = written, "wrote MacBinary");
    Ok(written)
}
