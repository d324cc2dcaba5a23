//! Encoders and decoders for classic Mac OS alias records, resource forks and MacBinary
//!
#![allow(clippy::cast_possible_truncation)] // Widths are checked before narrowing
#![allow(clippy::cast_possible_wrap)] // Two's-complement field handling
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Mac OS terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
//! Classic Mac OS files carry metadata the host filesystem knows nothing
//! about: Finder type and creator codes, a resource fork next to the data
//! fork, and for aliases a binary record describing where the target lives.
//! This crate reads and writes those structures.
//!
//! # Supported Formats
//!
//! - **Structured records**: schema-driven codec for fixed binary headers
//! - **Alias records**: Alias Manager records with their extras list
//! - **Resource forks**: resource maps with names, attributes and data
//! - **MacBinary**: MacBinary II/III envelopes with header CRC
//! - **Mac timestamps**: seconds since 1904 in local time
//!
//! Disk images themselves are reached through the [`volume::VolumeAccess`]
//! trait, which [`alias::create_alias_file`] uses to look up the target and
//! copy the finished alias onto a volume.
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: every format has a reader and a writer
//! - **Stream Based**: codecs work on `Read`/`Write` streams and compose
//!   when one structure is embedded in another
//! - **Round-Trip Guarantee**: reading what was written yields the same record

#![warn(missing_docs)]

/// Alias records and alias files
pub mod alias;
/// MacBinary envelopes
///
/// A MacBinary file packs a data fork, a resource fork and the Finder
/// metadata of one Mac file into a single byte stream behind a 128-byte
/// header protected by a CRC-16.
pub mod macbinary;
pub mod record;
/// Resource fork reading and writing
pub mod resource_fork;
pub mod time;
pub mod volume;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait for whole-buffer parsing and building
pub trait ClassicFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify that rebuilding parsed data reproduces it exactly
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
