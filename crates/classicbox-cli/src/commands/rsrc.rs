use super::{RsrcCommands, read_input};
use anyhow::{Context, Result, bail};
use classicbox_formats::ClassicFormat;
use classicbox_formats::resource_fork::{
    ResourceForkReadOptions, ResourceMap, read_resource_data_length, read_resource_fork,
    read_resource_fork_layout,
};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;

pub fn handle(cmd: RsrcCommands) -> Result<String> {
    match cmd {
        RsrcCommands::Info { file, no_names } => info(&file, !no_names),
        RsrcCommands::Verify { file } => verify(&file),
    }
}

/// Lists the map without loading resource bodies; sizes come from each length prefix
fn info(file: &Path, read_names: bool) -> Result<String> {
    let mut reader =
        BufReader::new(File::open(file).with_context(|| format!("failed to open {}", file.display()))?);
    let options = ResourceForkReadOptions {
        read_names,
        read_data: false,
    };
    let map = read_resource_fork(&mut reader, &options)
        .with_context(|| format!("failed to decode resource fork in {}", file.display()))?;

    reader.rewind()?;
    let layout = read_resource_fork_layout(&mut reader)?;
    let mut sizes = Vec::with_capacity(map.resource_count());
    for resource in map.resource_types.iter().flat_map(|t| &t.resources) {
        let size = match resource.data_offset {
            Some(offset) => read_resource_data_length(&mut reader, &layout, offset)
                .with_context(|| format!("failed to read data length of resource {}", resource.id))?,
            None => 0,
        };
        sizes.push(size);
    }
    Ok(describe_map(&map, &sizes))
}

fn describe_map(map: &ResourceMap, sizes: &[u32]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} resource types, {} resources, map attributes 0x{:04x}",
        map.resource_types.len(),
        map.resource_count(),
        map.attributes
    );
    let mut sizes = sizes.iter();
    for resource_type in &map.resource_types {
        let _ = writeln!(out, "\n'{}'", resource_type.code_text());
        for resource in &resource_type.resources {
            let _ = write!(
                out,
                "  {:>6}  attrs 0x{:02x}  {:>8} bytes",
                resource.id,
                resource.attributes,
                sizes.next().copied().unwrap_or_default()
            );
            match resource.name.as_deref() {
                Some(name) if !name.is_empty() => {
                    let _ = writeln!(out, "  {name:?}");
                }
                _ => out.push('\n'),
            }
        }
    }
    out
}

fn verify(file: &Path) -> Result<String> {
    let bytes = read_input(file)?;
    if let Err(error) = ResourceMap::verify_round_trip(&bytes) {
        bail!("{}: resource fork does not round-trip: {error}", file.display());
    }
    Ok(format!("{}: resource fork round-trips ({} bytes)\n", file.display(), bytes.len()))
}
