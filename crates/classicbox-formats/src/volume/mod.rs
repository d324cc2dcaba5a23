//! Access to HFS disk images
//!
//! Alias file creation needs to look up catalog information for the target
//! item and to copy the finished file onto a volume. Both go through
//! [`VolumeAccess`], so callers can back it with whatever HFS tooling they
//! have (or an in-memory fake in tests).

pub mod error;
pub mod path;

pub use error::{VolumeError, VolumeResult};
pub use path::{ancestor_paths, is_volume_path, item_name, normalize_path, parent_path};

use std::path::Path;

/// Catalog information about a mounted volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume name
    pub name: String,
    /// Creation date in Mac time
    pub created: u32,
    /// Modification date in Mac time
    pub modified: u32,
}

/// Catalog information about a file, folder or the volume root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    /// Catalog node ID (file number or directory ID)
    pub id: u32,
    /// Item name
    pub name: String,
    /// Whether the item is a file rather than a folder
    pub is_file: bool,
    /// Four-character file type, empty for folders
    pub file_type: String,
    /// Four-character creator code, empty for folders
    pub creator: String,
    /// Creation date in Mac time
    pub created: u32,
}

/// Operations alias file composition needs from a volume
pub trait VolumeAccess {
    /// Mount the disk image, making it the current volume
    fn mount(&mut self, image: &Path) -> VolumeResult<VolumeInfo>;

    /// Look up an item on the current volume by absolute path
    fn stat(&mut self, path: &str) -> VolumeResult<ItemInfo>;

    /// Write a MacBinary-encoded file to `path` on the current volume
    fn copy_in(&mut self, macbinary: &[u8], path: &str) -> VolumeResult<()>;

    /// Whether an item exists at `path` on the current volume
    fn exists(&mut self, path: &str) -> VolumeResult<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(VolumeError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete the item at `path` on the current volume
    fn delete(&mut self, path: &str) -> VolumeResult<()>;
}
