//! Resource fork reading

use super::header::{ForkHeader, MapHeader, NO_NAME, ReferenceEntry, TypeEntry};
use super::{
    Resource, ResourceForkLayout, ResourceForkReadOptions, ResourceMap, ResourceType,
    error::ResourceForkResult,
};
use crate::record::primitive::{read_fixed_bytes, read_pascal_string, read_unsigned};
use binrw::BinRead;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Read the fork header and map header of the fork starting at the cursor
pub fn read_resource_fork_layout<R: Read + Seek>(reader: &mut R) -> ResourceForkResult<ResourceForkLayout> {
    let base = reader.stream_position()?;
    let fork_header = ForkHeader::read(reader)?;
    reader.seek(SeekFrom::Start(base + u64::from(fork_header.offset_to_map)))?;
    let map_header = MapHeader::read(reader)?;

    Ok(ResourceForkLayout {
        base,
        fork_header,
        map_header,
    })
}

/// Read a resource fork starting at the cursor
///
/// The map is always read; names and data are looked up afterwards as
/// `options` asks. The cursor is left at an unspecified position.
pub fn read_resource_fork<R: Read + Seek>(
    reader: &mut R,
    options: &ResourceForkReadOptions,
) -> ResourceForkResult<ResourceMap> {
    let layout = read_resource_fork_layout(reader)?;
    let type_count = layout.map_header.type_count();

    // Type entries follow the count that opens the type list
    reader.seek(SeekFrom::Start(layout.type_list_start() + 2))?;
    let mut type_entries = Vec::with_capacity(type_count);
    for _ in 0..type_count {
        type_entries.push(TypeEntry::read(reader)?);
    }

    let mut resource_types = Vec::with_capacity(type_count);
    for type_entry in &type_entries {
        reader.seek(SeekFrom::Start(
            layout.type_list_start() + u64::from(type_entry.reference_list_offset),
        ))?;
        let mut references = Vec::with_capacity(type_entry.count());
        for _ in 0..type_entry.count() {
            references.push(ReferenceEntry::read(reader)?);
        }

        let mut resources = Vec::with_capacity(references.len());
        for reference in references {
            let name = if options.read_names {
                Some(read_resource_name(reader, &layout, reference.name_offset)?)
            } else {
                None
            };
            let data = if options.read_data {
                Some(read_resource_data(reader, &layout, reference.data_offset)?)
            } else {
                None
            };
            resources.push(Resource {
                id: reference.id,
                name,
                attributes: reference.attributes,
                data,
                data_offset: Some(reference.data_offset),
                name_offset: (reference.name_offset != NO_NAME).then_some(reference.name_offset),
            });
        }

        resource_types.push(ResourceType {
            code: type_entry.code,
            resources,
        });
    }

    let map = ResourceMap {
        attributes: layout.map_header.attributes,
        resource_types,
    };
    debug!(
        types = map.resource_types.len(),
        resources = map.resource_count(),
        data_area_length = layout.fork_header.data_area_length,
        map_length = layout.fork_header.map_length,
        "read resource fork"
    );
    Ok(map)
}

/// Read the name stored at `name_offset` in the name list
///
/// Returns an empty name for [`NO_NAME`].
pub fn read_resource_name<R: Read + Seek>(
    reader: &mut R,
    layout: &ResourceForkLayout,
    name_offset: u16,
) -> ResourceForkResult<String> {
    if name_offset == NO_NAME {
        return Ok(String::new());
    }
    reader.seek(SeekFrom::Start(layout.name_list_start() + u64::from(name_offset)))?;
    Ok(read_pascal_string(reader, None)?)
}

/// Read the data stored at `data_offset` in the data area
pub fn read_resource_data<R: Read + Seek>(
    reader: &mut R,
    layout: &ResourceForkLayout,
    data_offset: u32,
) -> ResourceForkResult<Vec<u8>> {
    let length = read_resource_data_length(reader, layout, data_offset)? as usize;
    Ok(read_fixed_bytes(reader, length)?)
}

/// Read only the length prefix of the data stored at `data_offset`
pub fn read_resource_data_length<R: Read + Seek>(
    reader: &mut R,
    layout: &ResourceForkLayout,
    data_offset: u32,
) -> ResourceForkResult<u32> {
    reader.seek(SeekFrom::Start(layout.data_area_start() + u64::from(data_offset)))?;
    Ok(read_unsigned(reader, 4)? as u32)
}
