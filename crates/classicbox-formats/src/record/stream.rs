//! Stream position helpers
//!
//! Size and checksum fields are often only known after the bytes they
//! describe have been written. A [`Placeholder`] remembers where such a
//! field lives so it can be filled in later; filling always puts the cursor
//! back where it was, so writes that embed one record inside another keep
//! composing without knowing about the patch.

use super::primitive::write_zeros;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A fixed-width region of a stream to be filled in later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    offset: u64,
    width: usize,
}

impl Placeholder {
    /// Write `width` zero bytes at the cursor and remember their position
    pub fn reserve<W: Write + Seek>(writer: &mut W, width: usize) -> io::Result<Self> {
        let offset = writer.stream_position()?;
        write_zeros(writer, width)?;
        Ok(Self { offset, width })
    }

    /// Refer to a region that has already been written
    pub fn at(offset: u64, width: usize) -> Self {
        Self { offset, width }
    }

    /// Absolute stream offset of the region
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Overwrite the region with `bytes`, restoring the cursor afterwards
    pub fn fill<W: Write + Seek>(self, writer: &mut W, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() != self.width {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "placeholder is {} bytes wide, got {}",
                    self.width,
                    bytes.len()
                ),
            ));
        }
        patch_at(writer, self.offset, bytes)
    }
}

/// Overwrite bytes at `offset`, then seek back to where the cursor was
pub fn patch_at<W: Write + Seek>(writer: &mut W, offset: u64, bytes: &[u8]) -> io::Result<()> {
    let resume = writer.stream_position()?;
    writer.seek(SeekFrom::Start(offset))?;
    let written = writer.write_all(bytes);
    // Restore even when the patch itself failed
    writer.seek(SeekFrom::Start(resume))?;
    written
}

/// Number of bytes needed to bring `length` up to a multiple of `boundary`
pub fn padding_to_boundary(length: u64, boundary: u64) -> u64 {
    (boundary - length % boundary) % boundary
}

/// Write zero bytes until `written` reaches a multiple of `boundary`,
/// returning the number of padding bytes
pub fn pad_to_boundary<W: Write + ?Sized>(writer: &mut W, written: u64, boundary: u64) -> io::Result<u64> {
    let padding = padding_to_boundary(written, boundary);
    write_zeros(writer, padding as usize)?;
    Ok(padding)
}

/// Consume bytes until `consumed` reaches a multiple of `boundary`
///
/// Tolerates a stream that ends before the boundary, since some writers
/// drop the trailing padding of the final section. Returns the number of
/// bytes actually skipped.
pub fn skip_to_boundary<R: Read + ?Sized>(reader: &mut R, consumed: u64, boundary: u64) -> io::Result<u64> {
    let padding = padding_to_boundary(consumed, boundary);
    io::copy(&mut reader.take(padding), &mut io::sink())
}
