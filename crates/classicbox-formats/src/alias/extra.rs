//! Tagged extras that follow the fixed alias record header
//!
//! Each extra is a 2-byte type code, a 2-byte content length, the content,
//! and one padding byte when the length is odd. The list ends with an
//! [`Extra::End`] marker.

use crate::record::primitive::{read_fixed_bytes, read_unsigned, write_unsigned};
use crate::record::{Field, FieldCodec, FieldCodecs, RecordError, RecordResult, Value, macroman};
use std::fmt;
use std::io::{self, Read, Write};
use tracing::trace;

/// Type code of the parent directory name extra
pub const EXTRA_PARENT_DIRECTORY_NAME: u16 = 0;
/// Type code of the directory ID chain extra
pub const EXTRA_DIRECTORY_IDS: u16 = 1;
/// Type code of the absolute path extra
pub const EXTRA_ABSOLUTE_PATH: u16 = 2;
/// Type code of the end marker
pub const EXTRA_END: u16 = 0xFFFF;

/// Type tag of the extras field in the alias record schema
pub const EXTRAS_FIELD_TYPE: &str = "extras";

/// One alias record extra
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extra {
    /// Name of the folder holding the target
    ParentDirectoryName(String),
    /// Directory IDs of the target's ancestors, nearest first
    DirectoryIds(Vec<u32>),
    /// Full colon-separated path of the target
    AbsolutePath(String),
    /// End of the extras list
    End,
    /// Any type code without a dedicated decoding, kept as raw content
    Unknown {
        /// Type code
        code: u16,
        /// Undecoded content
        content: Vec<u8>,
    },
}

impl Extra {
    /// Type code written on the wire
    pub fn code(&self) -> u16 {
        match self {
            Self::ParentDirectoryName(_) => EXTRA_PARENT_DIRECTORY_NAME,
            Self::DirectoryIds(_) => EXTRA_DIRECTORY_IDS,
            Self::AbsolutePath(_) => EXTRA_ABSOLUTE_PATH,
            Self::End => EXTRA_END,
            Self::Unknown { code, .. } => *code,
        }
    }

    /// Symbolic name of the extra kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParentDirectoryName(_) => "parent_directory_name",
            Self::DirectoryIds(_) => "directory_ids",
            Self::AbsolutePath(_) => "absolute_path",
            Self::End => "end",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Interpret raw content according to the type code
    pub fn decode(code: u16, content: &[u8]) -> Self {
        match code {
            EXTRA_PARENT_DIRECTORY_NAME => Self::ParentDirectoryName(macroman::decode(content)),
            // A trailing partial ID is dropped
            EXTRA_DIRECTORY_IDS => Self::DirectoryIds(
                content
                    .chunks_exact(4)
                    .map(|id| u32::from_be_bytes([id[0], id[1], id[2], id[3]]))
                    .collect(),
            ),
            EXTRA_ABSOLUTE_PATH => Self::AbsolutePath(macroman::decode(content)),
            EXTRA_END => Self::End,
            _ => Self::Unknown {
                code,
                content: content.to_vec(),
            },
        }
    }

    /// Encode the content, without the type code, length or padding
    pub fn encode_content(&self) -> RecordResult<Vec<u8>> {
        match self {
            Self::ParentDirectoryName(text) | Self::AbsolutePath(text) => macroman::encode(text),
            Self::DirectoryIds(ids) => Ok(ids.iter().flat_map(|id| id.to_be_bytes()).collect()),
            Self::End => Ok(Vec::new()),
            Self::Unknown { content, .. } => Ok(content.clone()),
        }
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentDirectoryName(text) | Self::AbsolutePath(text) => {
                write!(f, "{}({text:?})", self.name())
            }
            Self::DirectoryIds(ids) => write!(f, "{}({ids:?})", self.name()),
            Self::End => write!(f, "{}", self.name()),
            Self::Unknown { code, content } => {
                write!(f, "unknown(0x{code:04x}, 0x{})", hex::encode(content))
            }
        }
    }
}

/// Field codec for the alias extras list
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtrasCodec;

impl ExtrasCodec {
    /// Registry holding just this codec, as the alias schema needs
    pub fn registry() -> FieldCodecs {
        FieldCodecs::new().register(EXTRAS_FIELD_TYPE, Self)
    }
}

/// Read the next type code, or `None` when the stream is already exhausted
fn read_extra_code(reader: &mut dyn Read) -> RecordResult<Option<u16>> {
    let mut buf = [0u8; 2];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(u16::from_be_bytes(buf)))
}

impl FieldCodec for ExtrasCodec {
    fn read(&self, reader: &mut dyn Read, _field: &Field) -> RecordResult<Value> {
        let mut extras = Vec::new();
        loop {
            let Some(code) = read_extra_code(reader)? else {
                if extras.is_empty() {
                    return Ok(Value::Extras(extras));
                }
                return Err(RecordError::UnterminatedExtras {
                    extras_read: extras.len(),
                });
            };
            let length = read_unsigned(reader, 2)? as usize;
            let content = read_fixed_bytes(reader, length)?;
            if length % 2 == 1 {
                read_fixed_bytes(reader, 1)?;
            }

            let extra = Extra::decode(code, &content);
            trace!(code, length, extra = %extra, "decoded alias extra");
            let done = extra == Extra::End;
            extras.push(extra);
            if done {
                return Ok(Value::Extras(extras));
            }
        }
    }

    fn write(&self, writer: &mut dyn Write, field: &Field, value: &Value) -> RecordResult<()> {
        let Value::Extras(extras) = value else {
            return Err(RecordError::TypeMismatch {
                field: field.name.to_string(),
                expected: "extras list",
            });
        };
        for extra in extras {
            let content = extra.encode_content()?;
            let length = u16::try_from(content.len()).map_err(|_| RecordError::SizeMismatch {
                expected: usize::from(u16::MAX),
                actual: content.len(),
            })?;
            write_unsigned(writer, 2, u64::from(extra.code()))?;
            write_unsigned(writer, 2, u64::from(length))?;
            writer.write_all(&content)?;
            if length % 2 == 1 {
                writer.write_all(&[0])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::FieldType;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const FIELD: Field = Field::new("extras", FieldType::Custom(EXTRAS_FIELD_TYPE), None);

    fn encode(extras: Vec<Extra>) -> Vec<u8> {
        let mut out = Vec::new();
        ExtrasCodec
            .write(&mut out, &FIELD, &Value::Extras(extras))
            .unwrap();
        out
    }

    fn decode(bytes: &[u8]) -> RecordResult<Value> {
        ExtrasCodec.read(&mut Cursor::new(bytes), &FIELD)
    }

    #[test]
    fn test_odd_length_is_padded() {
        let bytes = encode(vec![
            Extra::ParentDirectoryName("Boot".into()),
            Extra::AbsolutePath("Boot:App".into()),
            Extra::End,
        ]);
        assert_eq!(&bytes[..8], b"\x00\x00\x00\x04Boot");
        assert_eq!(&bytes[8..20], b"\x00\x02\x00\x08Boot:App");
        assert_eq!(&bytes[20..], b"\xFF\xFF\x00\x00");

        let bytes = encode(vec![Extra::AbsolutePath("Boot:".into())]);
        assert_eq!(bytes, b"\x00\x02\x00\x05Boot:\x00");
    }

    #[test]
    fn test_directory_ids() {
        let extras = vec![Extra::DirectoryIds(vec![16, 0x0102_0304]), Extra::End];
        let bytes = encode(extras.clone());
        assert_eq!(&bytes[..4], &[0, 1, 0, 8]);
        assert_eq!(&bytes[4..12], &[0, 0, 0, 16, 1, 2, 3, 4]);
        assert_eq!(decode(&bytes).unwrap(), Value::Extras(extras));
    }

    #[test]
    fn test_immediate_end_of_stream_is_empty() {
        assert_eq!(decode(&[]).unwrap(), Value::Extras(Vec::new()));
    }

    #[test]
    fn test_missing_end_marker() {
        let bytes = encode(vec![Extra::ParentDirectoryName("Boot".into())]);
        assert!(matches!(
            decode(&bytes),
            Err(RecordError::UnterminatedExtras { extras_read: 1 })
        ));
    }

    #[test]
    fn test_unknown_code_preserved() {
        let extras = vec![
            Extra::Unknown {
                code: 9,
                content: vec![1, 2, 3],
            },
            Extra::End,
        ];
        let bytes = encode(extras.clone());
        assert_eq!(&bytes[..8], &[0, 9, 0, 3, 1, 2, 3, 0]);
        assert_eq!(decode(&bytes).unwrap(), Value::Extras(extras));
    }

    #[test]
    fn test_stops_after_end_marker() {
        let mut bytes = encode(vec![Extra::End]);
        bytes.extend_from_slice(b"tail");
        let mut cursor = Cursor::new(bytes);
        ExtrasCodec.read(&mut cursor, &FIELD).unwrap();
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Extra::End.to_string(), "end");
        assert_eq!(
            Extra::DirectoryIds(vec![2, 3]).to_string(),
            "directory_ids([2, 3])"
        );
    }
}
