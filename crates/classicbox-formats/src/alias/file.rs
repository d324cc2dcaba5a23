//! Alias file composition
//!
//! An alias file is an ordinary file with the alias Finder flag set whose
//! resource fork holds the alias record as an `'alis'` resource with ID 0.
//! Volumes only exchange files in MacBinary form, so the finished alias is
//! an alias record inside a resource fork inside a MacBinary envelope.

use super::error::AliasResult;
use super::extra::Extra;
use super::record::{ALIAS_KIND_DIRECTORY, ALIAS_KIND_FILE, NLVL_DIFFERENT_VOLUME, alias_record_to_bytes};
use crate::macbinary::{FF_IS_ALIAS, MacBinary, write_macbinary};
use crate::record::Record;
use crate::resource_fork::{Resource, ResourceForkWriteOptions, ResourceMap, write_resource_fork};
use crate::volume::{
    ItemInfo, VolumeAccess, VolumeError, ancestor_paths, is_volume_path, item_name, normalize_path,
};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Resource type holding an alias record
pub const ALIAS_RESOURCE_TYPE: [u8; 4] = *b"alis";

/// Directory ID recorded as the parent of every volume
pub const VOLUMES_PARENT_ID: u32 = 1;

/// File type of an alias to an application
pub const ALIAS_TYPE_APPLICATION: &str = "adrp";
/// File type of an alias to a folder
pub const ALIAS_TYPE_FOLDER: &str = "fdrp";
/// File type of an alias to a volume
pub const ALIAS_TYPE_VOLUME: &str = "hdsk";
/// Creator of folder and volume aliases
pub const FINDER_CREATOR: &str = "MACS";

/// Where the alias record goes in the alias file's resource fork
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasResourceInfo {
    /// Resource type code
    pub code: [u8; 4],
    /// Resource ID
    pub id: i16,
    /// Resource name
    pub name: String,
    /// Resource attributes
    pub attributes: u8,
}

/// Finder metadata of the alias file itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasFileInfo {
    /// File type, which tells the Finder what kind of item the alias targets
    pub file_type: String,
    /// Creator code
    pub file_creator: String,
    /// Finder flags
    pub finder_flags: u8,
}

/// Everything needed to write an alias file for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasInfo {
    /// Alias record for the target
    pub alias_record: Record,
    /// Resource holding the record
    pub resource: AliasResourceInfo,
    /// Metadata of the alias file
    pub file: AliasFileInfo,
}

/// Build alias information for the item at `target_path` on the disk image
///
/// The alias is assumed to live on the same volume as the target, except
/// for volume targets.
pub fn alias_info_for_item<V: VolumeAccess + ?Sized>(
    volume: &mut V,
    image: &Path,
    target_path: &str,
) -> AliasResult<AliasInfo> {
    let target_path = normalize_path(target_path);
    let volume_info = volume.mount(image)?;
    let target = volume.stat(target_path)?;

    let resource = AliasResourceInfo {
        code: ALIAS_RESOURCE_TYPE,
        id: 0,
        name: format!("{} alias", target.name),
        attributes: 0,
    };

    let mut record = Record::new()
        .with("volume_name", volume_info.name.as_str())
        .with("volume_created", volume_info.created)
        .with("file_name", target.name.as_str())
        .with("file_number", target.id)
        // Catalog lookups do not expose creation dates precisely enough
        .with("file_created", 0u32)
        .with("nlvl_from", 1u16)
        .with("nlvl_to", 1u16);

    let file = if is_volume_path(target_path) {
        record.set("alias_kind", ALIAS_KIND_DIRECTORY);
        record.set("parent_directory_id", VOLUMES_PARENT_ID);
        record.set("file_created", volume_info.created);
        record.set("nlvl_from", NLVL_DIFFERENT_VOLUME);
        record.set("nlvl_to", NLVL_DIFFERENT_VOLUME);
        record.set("extras", vec![Extra::End]);
        AliasFileInfo {
            file_type: ALIAS_TYPE_VOLUME.to_string(),
            file_creator: FINDER_CREATOR.to_string(),
            finder_flags: FF_IS_ALIAS,
        }
    } else {
        let ancestors = stat_ancestors(volume, target_path)?;
        let (parent, _) = ancestors
            .split_first()
            .ok_or_else(|| VolumeError::InvalidPath(target_path.to_string()))?;
        // Every ancestor except the volume itself
        let directory_ids: Vec<u32> = ancestors[..ancestors.len() - 1].iter().map(|a| a.id).collect();

        record.set("parent_directory_id", parent.id);
        record.set("extras", standard_extras(&parent.name, directory_ids, target_path));

        if target.is_file {
            record.set("alias_kind", ALIAS_KIND_FILE);
            record.set("file_type", target.file_type.as_str());
            record.set("file_creator", target.creator.as_str());
            let file_type = if target.file_type == "APPL" {
                ALIAS_TYPE_APPLICATION
            } else {
                target.file_type.as_str()
            };
            AliasFileInfo {
                file_type: file_type.to_string(),
                file_creator: target.creator.clone(),
                finder_flags: FF_IS_ALIAS,
            }
        } else {
            record.set("alias_kind", ALIAS_KIND_DIRECTORY);
            AliasFileInfo {
                file_type: ALIAS_TYPE_FOLDER.to_string(),
                file_creator: FINDER_CREATOR.to_string(),
                finder_flags: FF_IS_ALIAS,
            }
        }
    };

    debug!(
        target = target_path,
        file_type = file.file_type.as_str(),
        "built alias info"
    );
    Ok(AliasInfo {
        alias_record: record,
        resource,
        file,
    })
}

/// Catalog entries of every folder containing `path`, nearest first,
/// ending with the volume
fn stat_ancestors<V: VolumeAccess + ?Sized>(volume: &mut V, path: &str) -> AliasResult<Vec<ItemInfo>> {
    let mut chain = ancestor_paths(path);
    chain.pop();
    let mut ancestors = Vec::with_capacity(chain.len());
    for ancestor in chain.iter().rev() {
        ancestors.push(volume.stat(ancestor)?);
    }
    Ok(ancestors)
}

fn standard_extras(parent_name: &str, directory_ids: Vec<u32>, target_path: &str) -> Vec<Extra> {
    let mut extras = vec![Extra::ParentDirectoryName(parent_name.to_string())];
    if !directory_ids.is_empty() {
        extras.push(Extra::DirectoryIds(directory_ids));
    }
    extras.push(Extra::AbsolutePath(target_path.to_string()));
    extras.push(Extra::End);
    extras
}

/// Encode a complete MacBinary alias file named `file_name`
pub fn build_alias_file(info: &AliasInfo, file_name: &str) -> AliasResult<Vec<u8>> {
    let record = alias_record_to_bytes(&info.alias_record)?;

    let mut map = ResourceMap::new();
    map.add_resource(
        info.resource.code,
        Resource::new(
            info.resource.id,
            info.resource.name.as_str(),
            info.resource.attributes,
            record,
        ),
    );
    let mut fork = Cursor::new(Vec::new());
    write_resource_fork(&mut fork, &map, &ResourceForkWriteOptions::default())?;

    let macbinary = MacBinary::new(file_name, &info.file.file_type, &info.file.file_creator)
        .with_field("finder_flags", info.file.finder_flags)
        .with_resource_fork(fork.into_inner());
    let mut out = Vec::new();
    write_macbinary(&mut out, &macbinary)?;
    Ok(out)
}

/// Create an alias at `output_path` on one disk image pointing at
/// `target_path` on another (or the same) image
///
/// The alias file is fully encoded before the output image is touched.
pub fn create_alias_file<V: VolumeAccess + ?Sized>(
    volume: &mut V,
    output_image: &Path,
    output_path: &str,
    target_image: &Path,
    target_path: &str,
) -> AliasResult<()> {
    let info = alias_info_for_item(volume, target_image, target_path)?;
    let file = build_alias_file(&info, item_name(output_path))?;

    volume.mount(output_image)?;
    volume.copy_in(&file, output_path)?;
    info!(output = output_path, target = target_path, bytes = file.len(), "created alias file");
    Ok(())
}
