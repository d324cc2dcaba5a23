//! MacBinary envelope support
//!
//! MacBinary packs a file's metadata, data fork, resource fork and Finder
//! comment into a single stream for transport over fork-unaware channels:
//!
//! - **Header** (128 bytes): name, type, creator, Finder flags, dates and
//!   section lengths, protected by a CRC-16 over its first 124 bytes
//! - **Data fork**, **resource fork**, **comment**: each zero-padded to the
//!   next 128-byte boundary, and omitted entirely when empty
//!
//! Writing produces MacBinary III; reading accepts MacBinary I, II and III.
//!
//! ```rust
//! use classicbox_formats::macbinary::{FF_IS_ALIAS, MacBinary, read_macbinary, write_macbinary};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = MacBinary::new("Read Me", "TEXT", "ttxt")
//!     .with_data_fork(b"hello".to_vec())
//!     .with_field("finder_flags", FF_IS_ALIAS);
//!
//! let mut out = Vec::new();
//! write_macbinary(&mut out, &file)?;
//! assert_eq!(out.len(), 256);
//!
//! let decoded = read_macbinary(&mut Cursor::new(out))?;
//! assert_eq!(decoded.filename(), Some("Read Me"));
//! assert!(decoded.header_crc_matches());
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod crc;
pub mod error;
pub mod header;
mod parser;

pub use builder::{encode_macbinary_header, write_macbinary};
pub use error::{MacBinaryError, MacBinaryResult};
pub use header::{HEADER_CRC_OFFSET, MACBINARY_HEADER_SCHEMA, MACBINARY_HEADER_SIZE};
pub use parser::read_macbinary;

use crate::ClassicFormat;
use crate::record::{Record, Value, describe_structure};
use std::fmt::Write as _;
use std::io::Cursor;

/// Finder flag: file is an alias
pub const FF_IS_ALIAS: u8 = 1 << 7;
/// Finder flag: item is invisible
pub const FF_IS_INVISIBLE: u8 = 1 << 6;
/// Finder flag: file has a BNDL resource, or folder is a package
pub const FF_HAS_BUNDLE: u8 = 1 << 5;
/// Finder flag: name is locked
pub const FF_NAME_LOCKED: u8 = 1 << 4;
/// Finder flag: file is stationery
pub const FF_IS_STATIONERY: u8 = 1 << 3;
/// Finder flag: item has a custom icon
pub const FF_HAS_CUSTOM_ICON: u8 = 1 << 2;
/// Finder flag: reserved
pub const FF_RESERVED: u8 = 1 << 1;
/// Finder flag: the Finder has recorded the file's bundle resources
pub const FF_HAS_BEEN_INITED: u8 = 1 << 0;

/// Extra Finder flag: extension contains no INIT resource
pub const FFE_HAS_NO_INITS: u8 = 1 << 7;
/// Extra Finder flag: application can be shared on a server
pub const FFE_IS_SHARED: u8 = 1 << 6;
/// Extra Finder flag: reserved
pub const FFE_REQUIRES_SWITCH_LAUNCH: u8 = 1 << 5;
/// Extra Finder flag: reserved color bit
pub const FFE_COLOR_RESERVED: u8 = 1 << 4;
/// Extra Finder flags: label color mask
pub const FFE_COLOR: u8 = (1 << 3) | (1 << 2) | (1 << 1);
/// Extra Finder flag: item is on the desktop (System 6)
pub const FFE_IS_ON_DESK: u8 = 1 << 0;

/// Script code: Roman, the only script filenames are decoded in
pub const SM_ROMAN: u8 = 0;
/// Script code: Japanese
pub const SM_JAPANESE: u8 = 1;
/// Script code: traditional Chinese
pub const SM_TRAD_CHINESE: u8 = 2;
/// Script code: Korean
pub const SM_KOREAN: u8 = 3;
/// Script code: Arabic
pub const SM_ARABIC: u8 = 4;
/// Script code: Hebrew
pub const SM_HEBREW: u8 = 5;
/// Script code: Greek
pub const SM_GREEK: u8 = 6;
/// Script code: Cyrillic
pub const SM_CYRILLIC: u8 = 7;
/// Script code: simplified Chinese
pub const SM_SIMP_CHINESE: u8 = 25;
/// Script code: Central European Roman
pub const SM_CENTRAL_EURO_ROMAN: u8 = 29;
/// Script code: uninterpreted symbols
pub const SM_UNINTERP: u8 = 32;
/// Script code: full Unicode input
pub const SM_UNICODE_SCRIPT: u8 = 0x7E;

/// A file packed as a MacBinary envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacBinary {
    /// Header fields; section lengths and `header_crc` are derived on write
    pub header: Record,
    /// Data fork, `None` when not supplied
    pub data_fork: Option<Vec<u8>>,
    /// Resource fork, `None` when not supplied
    pub resource_fork: Option<Vec<u8>>,
    /// Finder comment
    pub comment: Vec<u8>,
    crc_matches: bool,
}

impl MacBinary {
    /// Envelope for a file with the given name, type and creator and no forks yet
    pub fn new(filename: &str, file_type: &str, file_creator: &str) -> Self {
        Self::from_header(
            Record::new()
                .with("filename", filename)
                .with("file_type", file_type)
                .with("file_creator", file_creator),
        )
    }

    /// Envelope around an existing header record
    pub fn from_header(header: Record) -> Self {
        Self {
            header,
            data_fork: None,
            resource_fork: None,
            comment: Vec::new(),
            crc_matches: true,
        }
    }

    pub(crate) fn decoded(
        header: Record,
        data_fork: Vec<u8>,
        resource_fork: Vec<u8>,
        comment: Vec<u8>,
        crc_matches: bool,
    ) -> Self {
        Self {
            header,
            data_fork: Some(data_fork),
            resource_fork: Some(resource_fork),
            comment,
            crc_matches,
        }
    }

    /// Set the data fork
    pub fn with_data_fork(mut self, data: Vec<u8>) -> Self {
        self.data_fork = Some(data);
        self
    }

    /// Set the resource fork
    pub fn with_resource_fork(mut self, data: Vec<u8>) -> Self {
        self.resource_fork = Some(data);
        self
    }

    /// Set the Finder comment
    pub fn with_comment(mut self, comment: Vec<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Set any header field
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.header.set(name, value);
        self
    }

    /// Decoded filename
    pub fn filename(&self) -> Option<&str> {
        self.header.text("filename")
    }

    /// Four-character file type
    pub fn file_type(&self) -> Option<&str> {
        self.header.text("file_type")
    }

    /// Four-character creator code
    pub fn file_creator(&self) -> Option<&str> {
        self.header.text("file_creator")
    }

    /// Finder flags, see the `FF_*` constants
    pub fn finder_flags(&self) -> u8 {
        self.header.unsigned("finder_flags").map_or(0, |flags| flags as u8)
    }

    /// Whether the stored header CRC matched the header when it was read
    ///
    /// Always true for envelopes built in memory. MacBinary I files carry
    /// no CRC and report false.
    pub fn header_crc_matches(&self) -> bool {
        self.crc_matches
    }

    /// Render the header and section sizes for display
    pub fn describe(&self) -> String {
        let mut out = describe_structure(&self.header, MACBINARY_HEADER_SCHEMA, "MacBinary Header");
        for (title, section) in [
            ("Data Fork", self.data_fork.as_deref()),
            ("Resource Fork", self.resource_fork.as_deref()),
            ("Comment", Some(self.comment.as_slice())),
        ] {
            let _ = writeln!(out, "\n{title}\n{}", "=".repeat(title.len()));
            match section {
                Some(bytes) => {
                    let _ = writeln!(out, "{} bytes", bytes.len());
                }
                None => {
                    let _ = writeln!(out, "<absent>");
                }
            }
        }
        out
    }
}

impl ClassicFormat for MacBinary {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(read_macbinary(&mut Cursor::new(data))?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        write_macbinary(&mut out, self)?;
        Ok(out)
    }
}
