//! Resource fork writing
//!
//! Writing happens in two phases. The first assigns every resource its
//! offset into the data area and (when named) into the name list, then sizes
//! every map section; the second writes the fork header, data area, map
//! header, type list, reference lists and name list strictly in that order.

use super::error::{ResourceForkError, ResourceForkResult};
use super::header::{
    FORK_HEADER_SIZE, ForkHeader, MAP_HEADER_LENGTH, MAX_DATA_OFFSET, MapHeader, NO_NAME,
    REFERENCE_ENTRY_SIZE, ReferenceEntry, TYPE_ENTRY_SIZE, TypeEntry,
};
use super::{Resource, ResourceForkLayout, ResourceForkWriteOptions, ResourceMap, ResourceOrdering};
use crate::record::macroman;
use crate::record::primitive::{write_pascal_bytes, write_unsigned};
use binrw::BinWrite;
use std::io::{Seek, Write};
use tracing::debug;

/// Position of a resource as (type index, resource index)
type Slot = (usize, usize);

fn overflow(what: &'static str, value: impl Into<u64>) -> ResourceForkError {
    ResourceForkError::OffsetOverflow {
        what,
        value: value.into(),
    }
}

/// Everything computed before the first byte is written
struct ForkPlan<'a> {
    fork_header: ForkHeader,
    map_header: MapHeader,
    type_entries: Vec<TypeEntry>,
    reference_entries: Vec<ReferenceEntry>,
    data: Vec<&'a [u8]>,
    names: Vec<Vec<u8>>,
}

impl<'a> ForkPlan<'a> {
    fn compute(map: &'a ResourceMap, options: &ResourceForkWriteOptions) -> ResourceForkResult<Self> {
        if map.resource_types.is_empty() {
            return Err(ResourceForkError::EmptyResourceMap);
        }

        let mut slots: Vec<Slot> = Vec::new();
        for (t, resource_type) in map.resource_types.iter().enumerate() {
            if resource_type.resources.is_empty() {
                return Err(ResourceForkError::EmptyResourceType(resource_type.code_text()));
            }
            for (r, resource) in resource_type.resources.iter().enumerate() {
                for (missing, field) in [(resource.data.is_none(), "data"), (resource.name.is_none(), "name")] {
                    if missing {
                        return Err(ResourceForkError::MissingField {
                            code: resource_type.code_text(),
                            id: resource.id,
                            field,
                        });
                    }
                }
                slots.push((t, r));
            }
        }
        let resource = move |(t, r): Slot| -> &'a Resource { &map.resource_types[t].resources[r] };

        let mut data_order = slots.clone();
        // A recorded name offset keeps its name list entry even when the name is empty
        let mut name_order: Vec<Slot> = slots
            .iter()
            .copied()
            .filter(|&s| resource(s).name_offset.is_some() || resource(s).is_named())
            .collect();
        if options.ordering == ResourceOrdering::Recorded {
            // Stable, so resources without a recorded offset keep map order at the end
            data_order.sort_by_key(|&s| {
                let offset = resource(s).data_offset;
                (offset.is_none(), offset)
            });
            name_order.sort_by_key(|&s| {
                let offset = resource(s).name_offset;
                (offset.is_none(), offset)
            });
        }

        let mut data_offsets: Vec<Vec<u32>> = map
            .resource_types
            .iter()
            .map(|t| vec![0; t.resources.len()])
            .collect();
        let mut data = Vec::with_capacity(data_order.len());
        let mut next_data_offset: u64 = 0;
        for &(t, r) in &data_order {
            let bytes = resource((t, r)).data.as_deref().unwrap_or_default();
            data_offsets[t][r] = u32::try_from(next_data_offset)
                .ok()
                .filter(|&offset| offset <= MAX_DATA_OFFSET)
                .ok_or_else(|| overflow("data offset", next_data_offset))?;
            let length = bytes.len() as u64;
            next_data_offset += 4 + length + length % 2;
            data.push(bytes);
        }
        let data_area_length =
            u32::try_from(next_data_offset).map_err(|_| overflow("data area length", next_data_offset))?;

        let mut name_offsets: Vec<Vec<u16>> = map
            .resource_types
            .iter()
            .map(|t| vec![NO_NAME; t.resources.len()])
            .collect();
        let mut names = Vec::with_capacity(name_order.len());
        let mut next_name_offset: u64 = 0;
        for &(t, r) in &name_order {
            let name = macroman::encode(resource((t, r)).name.as_deref().unwrap_or_default())?;
            name_offsets[t][r] = u16::try_from(next_name_offset)
                .ok()
                .filter(|&offset| offset != NO_NAME)
                .ok_or_else(|| overflow("name offset", next_name_offset))?;
            next_name_offset += 1 + name.len() as u64;
            names.push(name);
        }

        let type_list_length = 2 + u64::from(TYPE_ENTRY_SIZE) * map.resource_types.len() as u64;
        let mut type_entries = Vec::with_capacity(map.resource_types.len());
        let mut reference_entries = Vec::with_capacity(slots.len());
        let mut next_reference_offset: u64 = 0;
        for (t, resource_type) in map.resource_types.iter().enumerate() {
            let count = resource_type.resources.len();
            let reference_list_offset = type_list_length + next_reference_offset;
            type_entries.push(TypeEntry {
                code: resource_type.code,
                count_minus_one: u16::try_from(count - 1)
                    .map_err(|_| overflow("resource count", count as u64))?,
                reference_list_offset: u16::try_from(reference_list_offset)
                    .map_err(|_| overflow("reference list offset", reference_list_offset))?,
            });
            for (r, resource) in resource_type.resources.iter().enumerate() {
                reference_entries.push(ReferenceEntry::new(
                    resource.id,
                    name_offsets[t][r],
                    resource.attributes,
                    data_offsets[t][r],
                ));
            }
            next_reference_offset += u64::from(REFERENCE_ENTRY_SIZE) * count as u64;
        }

        let offset_to_name_list = u64::from(MAP_HEADER_LENGTH) + type_list_length + next_reference_offset;
        let map_length = offset_to_name_list + next_name_offset;
        let type_count = map.resource_types.len();
        let map_header = MapHeader::new(
            map.attributes,
            u16::try_from(offset_to_name_list).map_err(|_| overflow("name list offset", offset_to_name_list))?,
            u16::try_from(type_count - 1).map_err(|_| overflow("type count", type_count as u64))?,
        );

        let map_length = u32::try_from(map_length).map_err(|_| overflow("map length", map_length))?;
        if FORK_HEADER_SIZE.checked_add(data_area_length).is_none() {
            return Err(overflow("map offset", u64::from(FORK_HEADER_SIZE) + next_data_offset));
        }

        Ok(Self {
            fork_header: ForkHeader::new(data_area_length, map_length),
            map_header,
            type_entries,
            reference_entries,
            data,
            names,
        })
    }
}

/// Write `map` as a resource fork starting at the cursor
///
/// Every resource must carry its name and data. Returns the headers that
/// were written, with `base` set to the fork's starting stream offset.
pub fn write_resource_fork<W: Write + Seek>(
    writer: &mut W,
    map: &ResourceMap,
    options: &ResourceForkWriteOptions,
) -> ResourceForkResult<ResourceForkLayout> {
    let plan = ForkPlan::compute(map, options)?;
    let base = writer.stream_position()?;

    plan.fork_header.write(writer)?;
    for bytes in &plan.data {
        write_unsigned(writer, 4, bytes.len() as u64)?;
        writer.write_all(bytes)?;
        if bytes.len() % 2 == 1 {
            writer.write_all(&[0])?;
        }
    }

    plan.map_header.write(writer)?;
    for entry in &plan.type_entries {
        entry.write(writer)?;
    }
    for entry in &plan.reference_entries {
        entry.write(writer)?;
    }
    for name in &plan.names {
        write_pascal_bytes(writer, None, name)?;
    }

    debug!(
        types = plan.type_entries.len(),
        resources = plan.reference_entries.len(),
        data_area_length = plan.fork_header.data_area_length,
        map_length = plan.fork_header.map_length,
        "wrote resource fork"
    );
    Ok(ResourceForkLayout {
        base,
        fork_header: plan.fork_header,
        map_header: plan.map_header,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resource_fork::{
        ResourceForkReadOptions, ResourceType, read_resource_data_length, read_resource_fork,
        read_resource_fork_layout,
    };
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn write(map: &ResourceMap, ordering: ResourceOrdering) -> ResourceForkResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        write_resource_fork(&mut out, map, &ResourceForkWriteOptions { ordering })?;
        Ok(out.into_inner())
    }

    #[test]
    fn test_single_resource_layout() {
        let mut map = ResourceMap::new();
        map.add_resource(*b"alis", Resource::new(0, "x alias", 0, vec![1, 2, 3, 4]));
        let bytes = write(&map, ResourceOrdering::Recorded).unwrap();

        assert_eq!(bytes.len(), 256 + 8 + 58);
        assert_eq!(&bytes[..16], &[0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 8, 0, 0, 0, 58]);
        assert_eq!(&bytes[256..264], &[0, 0, 0, 4, 1, 2, 3, 4]);

        let map_bytes = &bytes[264..];
        assert_eq!(&map_bytes[22..30], &[0, 0, 0, 28, 0, 50, 0, 0]);
        assert_eq!(&map_bytes[30..38], b"alis\x00\x00\x00\x0A");
        assert_eq!(&map_bytes[38..50], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&map_bytes[50..], b"\x07x alias");
    }

    #[test]
    fn test_odd_data_is_padded() {
        let mut map = ResourceMap::new();
        map.add_resource(*b"DATA", Resource::new(1, "", 0, vec![9; 3]));
        map.add_resource(*b"DATA", Resource::new(2, "", 0, vec![8; 2]));
        let bytes = write(&map, ResourceOrdering::MapOrder).unwrap();

        assert_eq!(&bytes[256..264], &[0, 0, 0, 3, 9, 9, 9, 0]);
        assert_eq!(&bytes[264..270], &[0, 0, 0, 2, 8, 8]);

        let parsed = read_resource_fork(&mut Cursor::new(&bytes), &ResourceForkReadOptions::default()).unwrap();
        let offsets: Vec<_> = parsed.resource_types[0].resources.iter().map(|r| r.data_offset).collect();
        assert_eq!(offsets, vec![Some(0), Some(8)]);
        assert_eq!(parsed.resource_types[0].resources[0].name_offset, None);
    }

    #[test]
    fn test_empty_map_rejected() {
        assert!(matches!(
            write(&ResourceMap::new(), ResourceOrdering::Recorded),
            Err(ResourceForkError::EmptyResourceMap)
        ));
    }

    #[test]
    fn test_empty_type_rejected() {
        let mut map = ResourceMap::new();
        map.add_resource(*b"STR ", Resource::new(1, "", 0, Vec::new()));
        map.resource_types.push(ResourceType {
            code: *b"ICON",
            resources: Vec::new(),
        });
        assert!(matches!(
            write(&map, ResourceOrdering::Recorded),
            Err(ResourceForkError::EmptyResourceType(code)) if code == "ICON"
        ));
    }

    #[test]
    fn test_unloaded_fields_rejected() {
        let mut map = ResourceMap::new();
        let mut resource = Resource::new(5, "", 0, Vec::new());
        resource.data = None;
        map.add_resource(*b"STR ", resource);
        assert!(matches!(
            write(&map, ResourceOrdering::Recorded),
            Err(ResourceForkError::MissingField { field: "data", id: 5, .. })
        ));

        map.resource_types[0].resources[0].data = Some(Vec::new());
        map.resource_types[0].resources[0].name = None;
        assert!(matches!(
            write(&map, ResourceOrdering::Recorded),
            Err(ResourceForkError::MissingField { field: "name", .. })
        ));
    }

    #[test]
    fn test_recorded_order_preserved() {
        let mut map = ResourceMap::new();
        let mut late = Resource::new(1, "late", 0, b"late".to_vec());
        late.data_offset = Some(100);
        late.name_offset = Some(40);
        let mut early = Resource::new(2, "early", 0, b"early".to_vec());
        early.data_offset = Some(0);
        early.name_offset = Some(0);
        let new = Resource::new(3, "new", 0, b"new".to_vec());
        map.add_resource(*b"TEXT", late);
        map.add_resource(*b"TEXT", new);
        map.add_resource(*b"TEXT", early);

        let bytes = write(&map, ResourceOrdering::Recorded).unwrap();
        // early (4 + 5 + pad), late (4 + 4), new (4 + 3 + pad)
        assert_eq!(&bytes[260..265], b"early");
        assert_eq!(&bytes[270..274], b"late");
        assert_eq!(&bytes[278..281], b"new");

        let parsed = read_resource_fork(&mut Cursor::new(&bytes), &ResourceForkReadOptions::default()).unwrap();
        let ids: Vec<_> = parsed.resource_types[0].resources.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(parsed.find(b"TEXT", 2).unwrap().name_offset, Some(0));
        assert_eq!(parsed.find(b"TEXT", 1).unwrap().name_offset, Some(6));
        assert_eq!(parsed.find(b"TEXT", 3).unwrap().name_offset, Some(11));

        // Rewriting a decoded map reproduces it byte for byte
        assert_eq!(write(&parsed, ResourceOrdering::Recorded).unwrap(), bytes);
    }

    #[test]
    fn test_data_length_without_loading_data() {
        let mut map = ResourceMap::new();
        map.add_resource(*b"DATA", Resource::new(1, "", 0, vec![9; 3]));
        map.add_resource(*b"DATA", Resource::new(2, "", 0, vec![8; 300]));
        let bytes = write(&map, ResourceOrdering::MapOrder).unwrap();

        let mut reader = Cursor::new(&bytes);
        let options = ResourceForkReadOptions {
            read_names: false,
            read_data: false,
        };
        let parsed = read_resource_fork(&mut reader, &options).unwrap();
        reader.set_position(0);
        let layout = read_resource_fork_layout(&mut reader).unwrap();

        let lengths: Vec<u32> = parsed.resource_types[0]
            .resources
            .iter()
            .map(|r| read_resource_data_length(&mut reader, &layout, r.data_offset.unwrap()).unwrap())
            .collect();
        assert_eq!(lengths, vec![3, 300]);
        assert!(parsed.resource_types[0].resources.iter().all(|r| r.data.is_none()));
    }

    #[test]
    fn test_recorded_empty_name_survives_rewrite() {
        let mut map = ResourceMap::new();
        let mut blank = Resource::new(1, "", 0, b"blank".to_vec());
        blank.data_offset = Some(0);
        blank.name_offset = Some(0);
        map.add_resource(*b"TEXT", blank);
        map.add_resource(*b"TEXT", Resource::new(2, "", 0, b"none".to_vec()));

        let bytes = write(&map, ResourceOrdering::Recorded).unwrap();
        let parsed = read_resource_fork(&mut Cursor::new(&bytes), &ResourceForkReadOptions::default()).unwrap();
        let blank = parsed.find(b"TEXT", 1).unwrap();
        assert_eq!(blank.name.as_deref(), Some(""));
        assert_eq!(blank.name_offset, Some(0));
        assert_eq!(parsed.find(b"TEXT", 2).unwrap().name_offset, None);

        assert_eq!(write(&parsed, ResourceOrdering::Recorded).unwrap(), bytes);
    }

    #[test]
    fn test_fork_embedded_at_offset() {
        let mut map = ResourceMap::new();
        map.add_resource(*b"alis", Resource::new(0, "a", 0, vec![7]));

        let mut out = Cursor::new(Vec::new());
        out.write_all(&[0xAA; 10]).unwrap();
        let layout = write_resource_fork(&mut out, &map, &ResourceForkWriteOptions::default()).unwrap();
        assert_eq!(layout.base, 10);

        out.set_position(10);
        let parsed = read_resource_fork(&mut out, &ResourceForkReadOptions::default()).unwrap();
        assert_eq!(parsed.find(b"alis", 0).unwrap().data.as_deref(), Some(&[7u8][..]));
        assert_eq!(parsed.find(b"alis", 0).unwrap().name.as_deref(), Some("a"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use proptest::test_runner::TestCaseError;

        fn resource() -> impl Strategy<Value = Resource> {
            (
                any::<i16>(),
                "[a-zA-Z ]{0,12}",
                any::<u8>(),
                prop::collection::vec(any::<u8>(), 0..64),
            )
                .prop_map(|(id, name, attributes, data)| Resource::new(id, name, attributes, data))
        }

        fn resource_map() -> impl Strategy<Value = ResourceMap> {
            (
                any::<u16>(),
                prop::collection::vec(prop::collection::vec(resource(), 1..5), 1..5),
            )
                .prop_map(|(attributes, types)| ResourceMap {
                    attributes,
                    resource_types: types
                        .into_iter()
                        .enumerate()
                        .map(|(i, resources)| ResourceType {
                            code: [b'T', b'Y', b'P', b'0' + i as u8],
                            resources,
                        })
                        .collect(),
                })
        }

        proptest! {
            /// Section offsets and lengths agree for any map
            #[test]
            fn offsets_are_consistent(map in resource_map()) {
                let bytes = write(&map, ResourceOrdering::Recorded).map_err(|e| TestCaseError::fail(e.to_string()))?;
                let layout = read_resource_fork_layout(&mut Cursor::new(&bytes)).map_err(|e| TestCaseError::fail(e.to_string()))?;
                let fork = layout.fork_header;

                prop_assert_eq!(fork.offset_to_map, fork.offset_to_data_area + fork.data_area_length);
                prop_assert_eq!(bytes.len() as u64, u64::from(fork.offset_to_map) + u64::from(fork.map_length));
                prop_assert_eq!(layout.map_header.type_count(), map.resource_types.len());
                prop_assert_eq!(fork.data_area_length % 2, 0);

                let parsed = read_resource_fork(&mut Cursor::new(&bytes), &ResourceForkReadOptions::default())
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                for (original, decoded) in map.resource_types.iter().zip(&parsed.resource_types) {
                    prop_assert_eq!(original.code, decoded.code);
                    for (a, b) in original.resources.iter().zip(&decoded.resources) {
                        let data_offset = b.data_offset.unwrap_or(u32::MAX);
                        prop_assert!(data_offset < fork.data_area_length);
                        prop_assert_eq!(data_offset % 2, 0);
                        if let Some(name_offset) = b.name_offset {
                            prop_assert!(u64::from(name_offset) < layout.name_list_length());
                        }
                        prop_assert_eq!(a.id, b.id);
                        prop_assert_eq!(&a.name, &b.name);
                        prop_assert_eq!(a.attributes, b.attributes);
                        prop_assert_eq!(&a.data, &b.data);
                    }
                }
            }
        }
    }
}
