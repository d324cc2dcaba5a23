//! Primitive field codecs
//!
//! Big-endian integers of any width from 1 to 8 bytes, fixed-size byte and
//! text fields, length-prefixed Pascal strings and raw until-end fields.
//! Every function takes `?Sized` streams so the same code serves concrete
//! readers and the `dyn` streams handed to custom field codecs.

use super::error::{RecordError, RecordResult};
use super::macroman;
use std::io::{self, Read, Write};

/// Widest integer field supported
pub const MAX_INTEGER_WIDTH: usize = 8;

/// Longest content a Pascal string can carry
pub const MAX_PASCAL_LENGTH: usize = 255;

fn check_width(width: usize) -> RecordResult<()> {
    if width == 0 || width > MAX_INTEGER_WIDTH {
        return Err(RecordError::SizeMismatch {
            expected: MAX_INTEGER_WIDTH,
            actual: width,
        });
    }
    Ok(())
}

/// Read an unsigned big-endian integer of `width` bytes
pub fn read_unsigned<R: Read + ?Sized>(reader: &mut R, width: usize) -> RecordResult<u64> {
    check_width(width)?;
    let mut buf = [0u8; MAX_INTEGER_WIDTH];
    reader.read_exact(&mut buf[MAX_INTEGER_WIDTH - width..])?;
    Ok(u64::from_be_bytes(buf))
}

/// Read a two's-complement big-endian integer of `width` bytes
pub fn read_signed<R: Read + ?Sized>(reader: &mut R, width: usize) -> RecordResult<i64> {
    let value = read_unsigned(reader, width)?;
    let shift = 64 - 8 * width as u32;
    // Sign-extend from the top bit of the field
    Ok(((value << shift) as i64) >> shift)
}

/// Write an unsigned big-endian integer of `width` bytes
pub fn write_unsigned<W: Write + ?Sized>(writer: &mut W, width: usize, value: u64) -> RecordResult<()> {
    check_width(width)?;
    if width < MAX_INTEGER_WIDTH && value >> (8 * width) != 0 {
        return Err(RecordError::ValueOutOfRange {
            value: i128::from(value),
            width,
        });
    }
    writer.write_all(&value.to_be_bytes()[MAX_INTEGER_WIDTH - width..])?;
    Ok(())
}

/// Write a two's-complement big-endian integer of `width` bytes
pub fn write_signed<W: Write + ?Sized>(writer: &mut W, width: usize, value: i64) -> RecordResult<()> {
    check_width(width)?;
    let bits = 8 * width as u32;
    let min = -(1i128 << (bits - 1));
    let max = (1i128 << (bits - 1)) - 1;
    if !(min..=max).contains(&i128::from(value)) {
        return Err(RecordError::ValueOutOfRange {
            value: i128::from(value),
            width,
        });
    }
    writer.write_all(&value.to_be_bytes()[MAX_INTEGER_WIDTH - width..])?;
    Ok(())
}

/// Read exactly `size` bytes
pub fn read_fixed_bytes<R: Read + ?Sized>(reader: &mut R, size: usize) -> RecordResult<Vec<u8>> {
    let mut buf = vec![0u8; size];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Write a value that must be exactly `size` bytes long
pub fn write_fixed_bytes<W: Write + ?Sized>(writer: &mut W, size: usize, value: &[u8]) -> RecordResult<()> {
    if value.len() != size {
        return Err(RecordError::SizeMismatch {
            expected: size,
            actual: value.len(),
        });
    }
    writer.write_all(value)?;
    Ok(())
}

/// Read `size` bytes and decode them as MacRoman text
pub fn read_fixed_text<R: Read + ?Sized>(reader: &mut R, size: usize) -> RecordResult<String> {
    Ok(macroman::decode(&read_fixed_bytes(reader, size)?))
}

/// Encode text as MacRoman and write it as exactly `size` bytes
pub fn write_fixed_text<W: Write + ?Sized>(writer: &mut W, size: usize, value: &str) -> RecordResult<()> {
    write_fixed_bytes(writer, size, &macroman::encode(value)?)
}

/// Read a Pascal string: one length byte, content, then padding up to `max`
/// when a maximum is declared
pub fn read_pascal_bytes<R: Read + ?Sized>(reader: &mut R, max: Option<usize>) -> RecordResult<Vec<u8>> {
    let length = usize::from(read_fixed_bytes(reader, 1)?[0]);
    let content = read_fixed_bytes(reader, length)?;
    if let Some(max) = max {
        // A corrupt length byte may claim more than the field holds
        let padding = max.saturating_sub(length);
        io::copy(&mut reader.take(padding as u64), &mut io::sink())?;
    }
    Ok(content)
}

/// Write a Pascal string, zero-padding to `max` when a maximum is declared
pub fn write_pascal_bytes<W: Write + ?Sized>(writer: &mut W, max: Option<usize>, value: &[u8]) -> RecordResult<()> {
    let limit = max.unwrap_or(MAX_PASCAL_LENGTH).min(MAX_PASCAL_LENGTH);
    if value.len() > limit {
        return Err(RecordError::SizeMismatch {
            expected: limit,
            actual: value.len(),
        });
    }
    writer.write_all(&[value.len() as u8])?;
    writer.write_all(value)?;
    if let Some(max) = max {
        write_zeros(writer, max - value.len())?;
    }
    Ok(())
}

/// Read a Pascal string and decode it as MacRoman
pub fn read_pascal_string<R: Read + ?Sized>(reader: &mut R, max: Option<usize>) -> RecordResult<String> {
    Ok(macroman::decode(&read_pascal_bytes(reader, max)?))
}

/// Encode text as MacRoman and write it as a Pascal string
pub fn write_pascal_string<W: Write + ?Sized>(writer: &mut W, max: Option<usize>, value: &str) -> RecordResult<()> {
    write_pascal_bytes(writer, max, &macroman::encode(value)?)
}

/// Consume everything left in the stream
pub fn read_until_end<R: Read + ?Sized>(reader: &mut R) -> RecordResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Write `count` zero bytes
pub fn write_zeros<W: Write + ?Sized>(writer: &mut W, count: usize) -> io::Result<()> {
    const BLOCK: [u8; 1024] = [0; 1024];
    let mut remaining = count;
    while remaining > 0 {
        let chunk = remaining.min(BLOCK.len());
        writer.write_all(&BLOCK[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_unsigned_widths() {
        let mut out = Vec::new();
        write_unsigned(&mut out, 3, 0x0102_03).unwrap();
        write_unsigned(&mut out, 1, 0xFF).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0xFF]);

        let mut cursor = Cursor::new(out);
        assert_eq!(read_unsigned(&mut cursor, 3).unwrap(), 0x0102_03);
        assert_eq!(read_unsigned(&mut cursor, 1).unwrap(), 0xFF);
    }

    #[test]
    fn test_unsigned_out_of_range() {
        let mut out = Vec::new();
        assert!(matches!(
            write_unsigned(&mut out, 2, 0x1_0000),
            Err(RecordError::ValueOutOfRange { width: 2, .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_signed_twos_complement() {
        let mut out = Vec::new();
        write_signed(&mut out, 2, -2).unwrap();
        assert_eq!(out, vec![0xFF, 0xFE]);
        assert_eq!(read_signed(&mut Cursor::new(&out), 2).unwrap(), -2);

        let mut out = Vec::new();
        write_signed(&mut out, 2, i64::from(i16::MIN)).unwrap();
        assert_eq!(out, vec![0x80, 0x00]);
        assert!(write_signed(&mut out, 1, 128).is_err());
    }

    #[test]
    fn test_fixed_bytes_size_mismatch() {
        let mut out = Vec::new();
        assert!(matches!(
            write_fixed_bytes(&mut out, 4, b"abc"),
            Err(RecordError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_pascal_padding() {
        let mut out = Vec::new();
        write_pascal_string(&mut out, Some(27), "Boot").unwrap();
        assert_eq!(out.len(), 28);
        assert_eq!(&out[..5], b"\x04Boot");
        assert!(out[5..].iter().all(|&b| b == 0));

        let mut cursor = Cursor::new(&out);
        assert_eq!(read_pascal_string(&mut cursor, Some(27)).unwrap(), "Boot");
        assert_eq!(cursor.position(), 28);
    }

    #[test]
    fn test_pascal_dynamic_length() {
        let mut out = Vec::new();
        write_pascal_string(&mut out, None, "app alias").unwrap();
        assert_eq!(out, b"\x09app alias");
    }

    #[test]
    fn test_pascal_over_max() {
        let mut out = Vec::new();
        assert!(matches!(
            write_pascal_bytes(&mut out, Some(3), b"abcd"),
            Err(RecordError::SizeMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert!(write_pascal_bytes(&mut out, None, &[b'x'; 256]).is_err());
    }

    #[test]
    fn test_write_zeros_large() {
        let mut out = Vec::new();
        write_zeros(&mut out, 2500).unwrap();
        assert_eq!(out.len(), 2500);
    }
}
