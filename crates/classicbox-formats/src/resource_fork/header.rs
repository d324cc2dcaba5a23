//! Fixed-size tables of a resource fork
//!
//! All offsets in the map are relative: type list entries point into the
//! reference list area relative to the start of the type list, references
//! point into the data area and the name list relative to their starts.

use binrw::{BinRead, BinWrite};

/// Size of the fork header, including its reserved tail
pub const FORK_HEADER_SIZE: u32 = 256;

/// Size of the map header as stored, including the type count
pub const MAP_HEADER_SIZE: u16 = 30;

/// Length of the map header for offset arithmetic
///
/// The type count stored at the end of the map header is counted as the
/// first two bytes of the type list.
pub const MAP_HEADER_LENGTH: u16 = MAP_HEADER_SIZE - 2;

/// Size of one type list entry
pub const TYPE_ENTRY_SIZE: u16 = 8;

/// Size of one reference list entry
pub const REFERENCE_ENTRY_SIZE: u16 = 12;

/// Name offset marking a resource without a name
pub const NO_NAME: u16 = 0xFFFF;

/// Largest data offset a reference entry can hold
pub const MAX_DATA_OFFSET: u32 = 0x00FF_FFFF;

/// Fork header at the start of the resource fork
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct ForkHeader {
    /// Offset from the fork start to the resource data area
    pub offset_to_data_area: u32,
    /// Offset from the fork start to the resource map
    pub offset_to_map: u32,
    /// Length of the resource data area
    pub data_area_length: u32,
    /// Length of the resource map
    pub map_length: u32,
    /// Reserved for system use, written as zeros
    pub reserved: [u8; 240],
}

impl ForkHeader {
    /// Header for a data area of `data_area_length` followed by the map
    pub fn new(data_area_length: u32, map_length: u32) -> Self {
        Self {
            offset_to_data_area: FORK_HEADER_SIZE,
            offset_to_map: FORK_HEADER_SIZE + data_area_length,
            data_area_length,
            map_length,
            reserved: [0; 240],
        }
    }
}

/// Resource map header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct MapHeader {
    /// Reserved for a copy of the fork header
    pub header_copy: [u8; 16],
    /// Reserved for the handle to the next resource map
    pub next_map_handle: u32,
    /// Reserved for the file reference number
    pub file_ref: u16,
    /// Map attributes, see the `MAP_*` constants
    pub attributes: u16,
    /// Offset from the map start to the type list
    pub offset_to_type_list: u16,
    /// Offset from the map start to the name list
    pub offset_to_name_list: u16,
    /// Number of resource types minus one
    pub type_count_minus_one: u16,
}

impl MapHeader {
    /// Map header with zeroed reserved fields
    pub fn new(attributes: u16, offset_to_name_list: u16, type_count_minus_one: u16) -> Self {
        Self {
            header_copy: [0; 16],
            next_map_handle: 0,
            file_ref: 0,
            attributes,
            offset_to_type_list: MAP_HEADER_LENGTH,
            offset_to_name_list,
            type_count_minus_one,
        }
    }

    /// Number of resource types in the map
    pub fn type_count(&self) -> usize {
        usize::from(self.type_count_minus_one) + 1
    }
}

/// One entry of the type list
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct TypeEntry {
    /// Four-byte type code
    pub code: [u8; 4],
    /// Number of resources of this type minus one
    pub count_minus_one: u16,
    /// Offset from the type list start to this type's reference list
    pub reference_list_offset: u16,
}

impl TypeEntry {
    /// Number of resources of this type
    pub fn count(&self) -> usize {
        usize::from(self.count_minus_one) + 1
    }
}

/// One entry of a reference list
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct ReferenceEntry {
    /// Resource ID
    pub id: i16,
    /// Offset from the name list start to the name, or [`NO_NAME`]
    pub name_offset: u16,
    /// Resource attributes, see the `RES_*` constants
    pub attributes: u8,
    /// 24-bit offset from the data area start to the data (big-endian)
    #[br(map = |x: [u8; 3]| u32::from_be_bytes([0, x[0], x[1], x[2]]))]
    #[bw(map = |x: &u32| { let b = x.to_be_bytes(); [b[1], b[2], b[3]] })]
    pub data_offset: u32,
    /// Reserved for the resource handle
    pub handle: u32,
}

impl ReferenceEntry {
    /// Create a reference entry
    pub fn new(id: i16, name_offset: u16, attributes: u8, data_offset: u32) -> Self {
        Self {
            id,
            name_offset,
            attributes,
            data_offset,
            handle: 0,
        }
    }
}
