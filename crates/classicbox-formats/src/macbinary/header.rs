//! MacBinary header layout

use crate::record::{Field, FieldDefault as D, FieldType as T};

/// The 128-byte MacBinary III header, in encoding order
///
/// `data_fork_length`, `resource_fork_length`, `comment_length` and
/// `header_crc` are derived when writing.
pub const MACBINARY_HEADER_SCHEMA: &[Field] = &[
    Field::new("old_version", T::Unsigned(1), Some(D::Zero)),
    Field::new("filename", T::PascalBytes(Some(63)), None),
    Field::new("file_type", T::FixedText(4), None),
    Field::new("file_creator", T::FixedText(4), None),
    Field::new("finder_flags", T::Unsigned(1), Some(D::Zero)),
    Field::new("zero_1", T::Unsigned(1), Some(D::Zero)),
    Field::new("y_position", T::Unsigned(2), Some(D::Zero)),
    Field::new("x_position", T::Unsigned(2), Some(D::Zero)),
    Field::new("parent_directory_id", T::Unsigned(2), Some(D::Zero)),
    Field::new("protected", T::Unsigned(1), Some(D::Zero)),
    Field::new("zero_2", T::Unsigned(1), Some(D::Zero)),
    Field::new("data_fork_length", T::Unsigned(4), None),
    Field::new("resource_fork_length", T::Unsigned(4), None),
    Field::new("created", T::Unsigned(4), None),
    Field::new("modified", T::Unsigned(4), None),
    Field::new("comment_length", T::Unsigned(2), None),
    Field::new("extra_finder_flags", T::Unsigned(1), Some(D::Zero)),
    Field::new("signature", T::FixedBytes(4), Some(D::Bytes(MACBINARY_SIGNATURE))),
    Field::new("filename_script", T::Unsigned(1), Some(D::Zero)),
    Field::new("extended_finder_flags", T::Unsigned(1), Some(D::Zero)),
    Field::new("reserved", T::FixedBytes(8), Some(D::Zero)),
    Field::new("reserved_for_unpacked_size", T::Unsigned(4), Some(D::Zero)),
    Field::new("reserved_for_second_header_length", T::Unsigned(2), Some(D::Zero)),
    Field::new("version", T::Unsigned(1), Some(D::Unsigned(MACBINARY_VERSION))),
    Field::new("min_version_to_read", T::Unsigned(1), Some(D::Unsigned(MACBINARY_MIN_VERSION))),
    Field::new("header_crc", T::Unsigned(2), None),
    Field::new("reserved_for_computer_type_and_os_id", T::Unsigned(2), Some(D::Zero)),
];

/// Size of the header and the alignment of every following section
pub const MACBINARY_HEADER_SIZE: usize = 128;

/// Offset of `header_crc`; the CRC covers every byte before it
pub const HEADER_CRC_OFFSET: usize = 124;

/// MacBinary III signature
pub const MACBINARY_SIGNATURE: &[u8] = b"mBIN";

/// Version written by this encoder (MacBinary III)
pub const MACBINARY_VERSION: u64 = 130;

/// Oldest reader version able to read what this encoder writes (MacBinary II)
pub const MACBINARY_MIN_VERSION: u64 = 129;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{offset_of_field, sizeof_structure};

    #[test]
    fn test_layout() {
        assert_eq!(sizeof_structure(MACBINARY_HEADER_SCHEMA).unwrap(), MACBINARY_HEADER_SIZE);
        assert_eq!(
            offset_of_field(MACBINARY_HEADER_SCHEMA, "header_crc").unwrap(),
            HEADER_CRC_OFFSET
        );
        assert_eq!(offset_of_field(MACBINARY_HEADER_SCHEMA, "file_type").unwrap(), 65);
        assert_eq!(offset_of_field(MACBINARY_HEADER_SCHEMA, "data_fork_length").unwrap(), 83);
        assert_eq!(offset_of_field(MACBINARY_HEADER_SCHEMA, "signature").unwrap(), 102);
    }
}
