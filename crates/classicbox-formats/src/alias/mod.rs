//! Alias records and alias files
//!
//! An alias record is a relocatable reference to a file, folder or volume:
//! a fixed header identifying the target plus a list of [`Extra`] entries
//! that help the Alias Manager find it again after it moves.
//!
//! ```rust
//! use classicbox_formats::alias::{Extra, read_alias_record, write_alias_record};
//! use classicbox_formats::record::Record;
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = Record::new()
//!     .with("alias_kind", 0u16)
//!     .with("volume_name", "Boot")
//!     .with("file_name", "app")
//!     .with("nlvl_from", 1u16)
//!     .with("nlvl_to", 1u16)
//!     .with("extras", vec![Extra::AbsolutePath("Boot:app".into()), Extra::End]);
//!
//! let mut out = Cursor::new(Vec::new());
//! let size = write_alias_record(&mut out, &record)?;
//!
//! out.set_position(0);
//! let decoded = read_alias_record(&mut out)?;
//! assert_eq!(decoded.unsigned("record_size"), Some(size));
//! # Ok(())
//! # }
//! ```

pub mod error;
mod extra;
mod file;
mod record;

pub use error::{AliasError, AliasResult};
pub use extra::{
    EXTRA_ABSOLUTE_PATH, EXTRA_DIRECTORY_IDS, EXTRA_END, EXTRA_PARENT_DIRECTORY_NAME,
    EXTRAS_FIELD_TYPE, Extra, ExtrasCodec,
};
pub use file::{
    ALIAS_RESOURCE_TYPE, ALIAS_TYPE_APPLICATION, ALIAS_TYPE_FOLDER, ALIAS_TYPE_VOLUME,
    AliasFileInfo, AliasInfo, AliasResourceInfo, FINDER_CREATOR, VOLUMES_PARENT_ID,
    alias_info_for_item, build_alias_file, create_alias_file,
};
pub use record::{
    ALIAS_HEADER_SIZE, ALIAS_KIND_DIRECTORY, ALIAS_KIND_FILE, ALIAS_RECORD_SCHEMA,
    ALIAS_RECORD_VERSION, NLVL_DIFFERENT_VOLUME, RECORD_SIZE_OFFSET, alias_record_to_bytes,
    describe_alias_record, read_alias_record, write_alias_record,
};
