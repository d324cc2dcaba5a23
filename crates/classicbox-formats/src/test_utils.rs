//! Test utilities shared by the format test modules

use crate::ClassicFormat;
use crate::volume::{ItemInfo, VolumeAccess, VolumeError, VolumeInfo, VolumeResult, item_name};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Test round-trip serialization for a format instance
///
/// Builds the value, parses the bytes back and compares.
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: ClassicFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {original:?}\nParsed: {parsed:?}"
        )
        .into());
    }

    Ok(())
}

/// Test round-trip with existing binary data
///
/// Parses, rebuilds and reparses, requiring both parses to agree.
pub fn test_round_trip_with_data<T>(data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: ClassicFormat + PartialEq + Debug,
{
    let parsed = T::parse(data)?;
    let rebuilt = parsed.build()?;
    let reparsed = T::parse(&rebuilt)?;

    if parsed != reparsed {
        return Err(format!(
            "Round-trip with data failed:\nParsed: {parsed:?}\nReparsed: {reparsed:?}"
        )
        .into());
    }

    Ok(())
}

/// In-memory volume with a fixed catalog
///
/// The volume's root directory always has ID 2 and the volume name as its
/// item name, as on a real HFS volume.
pub struct FakeVolume {
    info: VolumeInfo,
    items: HashMap<String, ItemInfo>,
    mounted: Option<PathBuf>,
    copied: HashMap<String, Vec<u8>>,
}

impl FakeVolume {
    pub fn new(name: &str, created: u32) -> Self {
        let mut items = HashMap::new();
        items.insert(
            format!("{name}:"),
            ItemInfo {
                id: 2,
                name: name.to_string(),
                is_file: false,
                file_type: String::new(),
                creator: String::new(),
                created,
            },
        );
        Self {
            info: VolumeInfo {
                name: name.to_string(),
                created,
                modified: created,
            },
            items,
            mounted: None,
            copied: HashMap::new(),
        }
    }

    pub fn with_folder(mut self, path: &str, id: u32) -> Self {
        self.items.insert(
            path.to_string(),
            ItemInfo {
                id,
                name: item_name(path).to_string(),
                is_file: false,
                file_type: String::new(),
                creator: String::new(),
                created: self.info.created,
            },
        );
        self
    }

    pub fn with_file(mut self, path: &str, id: u32, file_type: &str, creator: &str) -> Self {
        self.items.insert(
            path.to_string(),
            ItemInfo {
                id,
                name: item_name(path).to_string(),
                is_file: true,
                file_type: file_type.to_string(),
                creator: creator.to_string(),
                created: self.info.created,
            },
        );
        self
    }

    pub fn mounted(&self) -> Option<&Path> {
        self.mounted.as_deref()
    }

    pub fn copied(&self, path: &str) -> Option<&[u8]> {
        self.copied.get(path).map(Vec::as_slice)
    }

    fn require_mounted(&self) -> VolumeResult<()> {
        if self.mounted.is_none() {
            return Err(VolumeError::NotMounted);
        }
        Ok(())
    }
}

impl VolumeAccess for FakeVolume {
    fn mount(&mut self, image: &Path) -> VolumeResult<VolumeInfo> {
        self.mounted = Some(image.to_path_buf());
        Ok(self.info.clone())
    }

    fn stat(&mut self, path: &str) -> VolumeResult<ItemInfo> {
        self.require_mounted()?;
        self.items
            .get(path)
            .cloned()
            .ok_or_else(|| VolumeError::NotFound(path.to_string()))
    }

    fn copy_in(&mut self, macbinary: &[u8], path: &str) -> VolumeResult<()> {
        self.require_mounted()?;
        self.copied.insert(path.to_string(), macbinary.to_vec());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> VolumeResult<()> {
        self.require_mounted()?;
        self.copied
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| VolumeError::NotFound(path.to_string()))
    }
}
