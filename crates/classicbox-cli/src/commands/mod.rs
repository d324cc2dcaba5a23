//! Subcommand definitions and shared file helpers

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

pub mod alias;
pub mod macbinary;
pub mod rsrc;

#[derive(Subcommand)]
pub enum AliasCommands {
    /// Print the fields of an alias record
    Info {
        /// File holding a raw alias record
        file: PathBuf,
    },
    /// Decode and re-encode an alias record, failing if the bytes differ
    Verify {
        /// File holding a raw alias record
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum RsrcCommands {
    /// List the resources in a resource fork
    Info {
        /// File holding a raw resource fork
        file: PathBuf,
        /// Skip reading resource names
        #[arg(long)]
        no_names: bool,
    },
    /// Decode and re-encode a resource fork, failing if the bytes differ
    Verify {
        /// File holding a raw resource fork
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum MacBinaryCommands {
    /// Print the header and section sizes of a MacBinary file
    Info {
        /// MacBinary file
        file: PathBuf,
    },
    /// Extract the forks and comment of a MacBinary file into a directory
    Unpack {
        /// MacBinary file
        file: PathBuf,
        /// Output directory, created if missing
        dir: PathBuf,
    },
    /// Build a MacBinary file from separate forks
    Pack {
        /// Output MacBinary file
        out: PathBuf,
        /// Mac filename
        #[arg(long)]
        name: String,
        /// Four-character file type
        #[arg(long = "type", value_parser = parse_ostype)]
        file_type: String,
        /// Four-character creator code
        #[arg(long, value_parser = parse_ostype)]
        creator: String,
        /// Data fork contents
        #[arg(long)]
        data: Option<PathBuf>,
        /// Resource fork contents
        #[arg(long)]
        rsrc: Option<PathBuf>,
    },
}

fn parse_ostype(value: &str) -> Result<String, String> {
    if value.chars().count() == 4 {
        Ok(value.to_string())
    } else {
        Err(format!("expected four characters, got {value:?}"))
    }
}

pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
