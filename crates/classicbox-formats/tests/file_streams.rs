//! Integration tests running the codecs against file-backed streams
//!
//! Both resource forks and MacBinary envelopes must work when they do not
//! start at offset zero, so each test writes a prefix first.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use classicbox_formats::ClassicFormat;
use classicbox_formats::macbinary::{MacBinary, read_macbinary, write_macbinary};
use classicbox_formats::resource_fork::{
    RES_PURGEABLE, Resource, ResourceForkReadOptions, ResourceForkWriteOptions, ResourceMap,
    ResourceOrdering, read_resource_data, read_resource_fork, read_resource_fork_layout,
    read_resource_name, write_resource_fork,
};
use pretty_assertions::assert_eq;
use std::io::{Seek, SeekFrom, Write};

const PREFIX: &[u8] = b"not part of the fork";

fn sample_map() -> ResourceMap {
    let mut map = ResourceMap::new();
    map.add_resource(*b"STR#", Resource::new(128, "Messages", 0, b"\x00\x01\x05Hello".to_vec()));
    map.add_resource(*b"ICN#", Resource::new(128, "", RES_PURGEABLE, vec![0xAA; 256]));
    map.add_resource(*b"STR#", Resource::new(129, "Errors", 0, b"\x00\x00".to_vec()));
    map
}

#[test]
fn resource_fork_in_file_at_offset() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(PREFIX).unwrap();

    let written = write_resource_fork(&mut file, &sample_map(), &ResourceForkWriteOptions::default()).unwrap();
    assert_eq!(written.base, PREFIX.len() as u64);
    let end = file.stream_position().unwrap();

    file.seek(SeekFrom::Start(PREFIX.len() as u64)).unwrap();
    let layout = read_resource_fork_layout(&mut file).unwrap();
    assert_eq!(layout, written);
    assert_eq!(
        end,
        layout.base + u64::from(layout.fork_header.offset_to_map) + u64::from(layout.fork_header.map_length)
    );

    file.seek(SeekFrom::Start(PREFIX.len() as u64)).unwrap();
    let map = read_resource_fork(&mut file, &ResourceForkReadOptions::default()).unwrap();
    assert_eq!(map.resource_count(), 3);
    let errors = map.find(b"STR#", 129).unwrap();
    assert_eq!(errors.name.as_deref(), Some("Errors"));
    assert_eq!(errors.data.as_deref(), Some(&b"\x00\x00"[..]));
    assert_eq!(map.find(b"ICN#", 128).unwrap().attributes, RES_PURGEABLE);
}

#[test]
fn map_only_read_then_random_access() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(PREFIX).unwrap();
    write_resource_fork(&mut file, &sample_map(), &ResourceForkWriteOptions::default()).unwrap();

    file.seek(SeekFrom::Start(PREFIX.len() as u64)).unwrap();
    let layout = read_resource_fork_layout(&mut file).unwrap();
    file.seek(SeekFrom::Start(PREFIX.len() as u64)).unwrap();
    let map = read_resource_fork(&mut file, &ResourceForkReadOptions::map_only()).unwrap();

    let messages = map.find(b"STR#", 128).unwrap();
    assert!(messages.name.is_none());
    assert!(messages.data.is_none());

    let name = read_resource_name(&mut file, &layout, messages.name_offset.unwrap()).unwrap();
    assert_eq!(name, "Messages");
    let data = read_resource_data(&mut file, &layout, messages.data_offset.unwrap()).unwrap();
    assert_eq!(data, b"\x00\x01\x05Hello");

    let icon = map.find(b"ICN#", 128).unwrap();
    assert!(icon.name_offset.is_none());
}

#[test]
fn rewrite_preserves_recorded_order() {
    let mut first = std::io::Cursor::new(Vec::new());
    let map_order = ResourceForkWriteOptions {
        ordering: ResourceOrdering::MapOrder,
    };
    write_resource_fork(&mut first, &sample_map(), &map_order).unwrap();
    let original = first.into_inner();

    // Reading records each resource's offset, and the default ordering reuses it
    let map = ResourceMap::parse(&original).unwrap();
    assert_eq!(map.build().unwrap(), original);
    ResourceMap::verify_round_trip(&original).unwrap();
}

#[test]
fn macbinary_in_file_at_offset() {
    let resource_fork = sample_map().build().unwrap();
    let envelope = MacBinary::new("Résumé", "TEXT", "ttxt")
        .with_data_fork(b"plain text".to_vec())
        .with_resource_fork(resource_fork.clone())
        .with_comment(b"a comment".to_vec())
        .with_field("created", 3_000_000_000u32)
        .with_field("modified", 3_000_000_001u32);

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(PREFIX).unwrap();
    let length = write_macbinary(&mut file, &envelope).unwrap();
    assert_eq!(length % 128, 0);
    assert_eq!(file.stream_position().unwrap(), PREFIX.len() as u64 + length);

    file.seek(SeekFrom::Start(PREFIX.len() as u64)).unwrap();
    let decoded = read_macbinary(&mut file).unwrap();
    assert_eq!(decoded.filename(), Some("Résumé"));
    assert_eq!(decoded.data_fork.as_deref(), Some(&b"plain text"[..]));
    assert_eq!(decoded.resource_fork.as_deref(), Some(resource_fork.as_slice()));
    assert_eq!(decoded.comment, b"a comment");
    assert_eq!(decoded.header.unsigned("created"), Some(3_000_000_000));
    assert!(decoded.header_crc_matches());

    let map = ResourceMap::parse(decoded.resource_fork.as_deref().unwrap()).unwrap();
    assert_eq!(map.resource_count(), 3);
}

#[test]
fn corrupted_header_crc_is_reported_not_fatal() {
    let envelope = MacBinary::new("Notes", "TEXT", "ttxt").with_data_fork(b"x".to_vec());
    let mut bytes = envelope.build().unwrap();
    bytes[124] ^= 0xFF;

    let decoded = MacBinary::parse(&bytes).unwrap();
    assert!(!decoded.header_crc_matches());
    assert_eq!(decoded.data_fork.as_deref(), Some(&b"x"[..]));
}
