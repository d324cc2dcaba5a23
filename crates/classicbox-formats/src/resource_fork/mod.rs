//! Resource fork format support
//!
//! A resource fork holds typed, numbered, optionally named blobs together
//! with a map to find them:
//!
//! - **Fork header** (256 bytes): offsets and lengths of the data area and map
//! - **Data area**: each resource as a 4-byte length, the data and a pad
//!   byte when the length is odd
//! - **Map**: map header, type list, reference lists and name list
//!
//! # Reading
//!
//! ```rust,no_run
//! use classicbox_formats::resource_fork::{ResourceForkReadOptions, read_resource_fork};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut file = File::open("Finder.rsrc")?;
//! let map = read_resource_fork(&mut file, &ResourceForkReadOptions::map_only())?;
//! for resource_type in &map.resource_types {
//!     println!("{}: {} resources", resource_type.code_text(), resource_type.resources.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Writing
//!
//! ```rust
//! use classicbox_formats::resource_fork::{Resource, ResourceMap};
//! use classicbox_formats::ClassicFormat;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut map = ResourceMap::new();
//! map.add_resource(*b"STR ", Resource::new(128, "greeting", 0, b"\x05hello".to_vec()));
//! let bytes = map.build()?;
//! assert_eq!(ResourceMap::parse(&bytes)?.find(b"STR ", 128).map(|r| r.id), Some(128));
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod error;
pub mod header;
mod parser;

pub use builder::write_resource_fork;
pub use error::{ResourceForkError, ResourceForkResult};
pub use header::{ForkHeader, MapHeader, ReferenceEntry, TypeEntry};
pub use parser::{
    read_resource_data, read_resource_data_length, read_resource_fork, read_resource_fork_layout,
    read_resource_name,
};

use crate::ClassicFormat;
use crate::record::macroman;
use std::io::Cursor;

/// Resource attribute: read into the system heap
pub const RES_SYS_HEAP: u8 = 64;
/// Resource attribute: purgeable
pub const RES_PURGEABLE: u8 = 32;
/// Resource attribute: locked
pub const RES_LOCKED: u8 = 16;
/// Resource attribute: protected
pub const RES_PROTECTED: u8 = 8;
/// Resource attribute: preloaded
pub const RES_PRELOAD: u8 = 4;
/// Resource attribute: to be written back to the fork
pub const RES_CHANGED: u8 = 2;

/// Map attribute: file is read-only
pub const MAP_READ_ONLY: u16 = 128;
/// Map attribute: compact the file on update
pub const MAP_COMPACT: u16 = 64;
/// Map attribute: write the map on update
pub const MAP_CHANGED: u16 = 32;

/// One resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Resource ID
    pub id: i16,
    /// Name; `Some("")` is unnamed unless `name_offset` is set, `None` a name not loaded
    pub name: Option<String>,
    /// Attributes, see the `RES_*` constants
    pub attributes: u8,
    /// Contents, `None` when not loaded
    pub data: Option<Vec<u8>>,
    /// Offset into the data area this resource was read from
    pub data_offset: Option<u32>,
    /// Offset into the name list this resource's name was read from
    pub name_offset: Option<u16>,
}

impl Resource {
    /// Create a resource that has not been read from a fork
    pub fn new(id: i16, name: impl Into<String>, attributes: u8, data: Vec<u8>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            attributes,
            data: Some(data),
            data_offset: None,
            name_offset: None,
        }
    }

    /// Whether the resource carries a non-empty name
    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// All resources sharing one type code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Four-byte type code
    pub code: [u8; 4],
    /// Resources in map order
    pub resources: Vec<Resource>,
}

impl ResourceType {
    /// Type code decoded as MacRoman
    pub fn code_text(&self) -> String {
        macroman::decode(&self.code)
    }
}

/// A decoded or to-be-encoded resource map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    /// Map attributes, see the `MAP_*` constants
    pub attributes: u16,
    /// Resource types in map order
    pub resource_types: Vec<ResourceType>,
}

impl ResourceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource, creating its type at the end of the type list if needed
    pub fn add_resource(&mut self, code: [u8; 4], resource: Resource) {
        match self.resource_types.iter_mut().find(|t| t.code == code) {
            Some(resource_type) => resource_type.resources.push(resource),
            None => self.resource_types.push(ResourceType {
                code,
                resources: vec![resource],
            }),
        }
    }

    /// Look up a resource type by code
    pub fn resource_type(&self, code: &[u8; 4]) -> Option<&ResourceType> {
        self.resource_types.iter().find(|t| &t.code == code)
    }

    /// Look up a resource by type code and ID
    pub fn find(&self, code: &[u8; 4], id: i16) -> Option<&Resource> {
        self.resource_type(code)?.resources.iter().find(|r| r.id == id)
    }

    /// Total number of resources across all types
    pub fn resource_count(&self) -> usize {
        self.resource_types.iter().map(|t| t.resources.len()).sum()
    }
}

/// What to load beyond the map itself when reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceForkReadOptions {
    /// Read each resource's name from the name list
    pub read_names: bool,
    /// Read each resource's data from the data area
    pub read_data: bool,
}

impl ResourceForkReadOptions {
    /// Read only the map, skipping names and data
    pub fn map_only() -> Self {
        Self {
            read_names: false,
            read_data: false,
        }
    }
}

impl Default for ResourceForkReadOptions {
    fn default() -> Self {
        Self {
            read_names: true,
            read_data: true,
        }
    }
}

/// Physical order of resources in the data area and name list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceOrdering {
    /// Ascending by the offset each resource was read from; new resources last
    #[default]
    Recorded,
    /// Type list order, then reference list order
    MapOrder,
}

/// Options for writing a resource fork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceForkWriteOptions {
    /// Physical order of data and names
    pub ordering: ResourceOrdering,
}

/// Headers of a resource fork located in a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceForkLayout {
    /// Stream offset of the fork start
    pub base: u64,
    /// Fork header
    pub fork_header: ForkHeader,
    /// Map header
    pub map_header: MapHeader,
}

impl ResourceForkLayout {
    /// Stream offset of the resource map
    pub fn map_start(&self) -> u64 {
        self.base + u64::from(self.fork_header.offset_to_map)
    }

    /// Stream offset of the type list, including its leading count
    pub fn type_list_start(&self) -> u64 {
        self.map_start() + u64::from(self.map_header.offset_to_type_list)
    }

    /// Stream offset of the name list
    pub fn name_list_start(&self) -> u64 {
        self.map_start() + u64::from(self.map_header.offset_to_name_list)
    }

    /// Stream offset of the data area
    pub fn data_area_start(&self) -> u64 {
        self.base + u64::from(self.fork_header.offset_to_data_area)
    }

    /// Length of the name list
    pub fn name_list_length(&self) -> u64 {
        u64::from(self.fork_header.map_length)
            .saturating_sub(u64::from(self.map_header.offset_to_name_list))
    }
}

impl ClassicFormat for ResourceMap {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(read_resource_fork(
            &mut Cursor::new(data),
            &ResourceForkReadOptions::default(),
        )?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let mut out = Cursor::new(Vec::new());
        write_resource_fork(&mut out, self, &ResourceForkWriteOptions::default())?;
        Ok(out.into_inner())
    }
}
