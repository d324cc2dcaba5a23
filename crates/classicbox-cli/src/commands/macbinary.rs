use super::{MacBinaryCommands, read_input, write_output};
use anyhow::{Context, Result};
use classicbox_formats::macbinary::{MacBinary, read_macbinary, write_macbinary};
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn handle(cmd: MacBinaryCommands) -> Result<String> {
    match cmd {
        MacBinaryCommands::Info { file } => info(&file),
        MacBinaryCommands::Unpack { file, dir } => unpack(&file, &dir),
        MacBinaryCommands::Pack {
            out,
            name,
            file_type,
            creator,
            data,
            rsrc,
        } => pack(&out, &name, &file_type, &creator, data.as_deref(), rsrc.as_deref()),
    }
}

fn decode(file: &Path) -> Result<MacBinary> {
    let bytes = read_input(file)?;
    let macbinary = read_macbinary(&mut Cursor::new(bytes))
        .with_context(|| format!("failed to decode MacBinary file {}", file.display()))?;
    if !macbinary.header_crc_matches() {
        warn!(file = %file.display(), "header CRC does not match, file may be MacBinary I or damaged");
    }
    Ok(macbinary)
}

fn info(file: &Path) -> Result<String> {
    Ok(decode(file)?.describe())
}

/// Host filename for a Mac filename, which may contain `/`
fn host_name(mac_name: &str) -> String {
    mac_name.replace('/', ":")
}

fn unpack(file: &Path, dir: &Path) -> Result<String> {
    let macbinary = decode(file)?;
    let base = host_name(macbinary.filename().unwrap_or("untitled"));

    let mut outputs: Vec<(PathBuf, &[u8])> = Vec::new();
    for (suffix, section) in [
        ("", macbinary.data_fork.as_deref()),
        (".rsrc", macbinary.resource_fork.as_deref()),
        (".comment", Some(macbinary.comment.as_slice())),
    ] {
        if let Some(bytes) = section.filter(|bytes| !bytes.is_empty()) {
            outputs.push((dir.join(format!("{base}{suffix}")), bytes));
        }
    }

    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut report = String::new();
    for (path, bytes) in &outputs {
        write_output(path, bytes)?;
        let _ = writeln!(report, "{} ({} bytes)", path.display(), bytes.len());
    }
    info!(files = outputs.len(), "unpacked MacBinary");
    Ok(report)
}

fn pack(
    out: &Path,
    name: &str,
    file_type: &str,
    creator: &str,
    data: Option<&Path>,
    rsrc: Option<&Path>,
) -> Result<String> {
    let mut macbinary = MacBinary::new(name, file_type, creator);
    if let Some(path) = data {
        macbinary = macbinary.with_data_fork(read_input(path)?);
    }
    if let Some(path) = rsrc {
        macbinary = macbinary.with_resource_fork(read_input(path)?);
    }

    let mut bytes = Vec::new();
    write_macbinary(&mut bytes, &macbinary).context("failed to encode MacBinary file")?;
    write_output(out, &bytes)?;
    Ok(format!("{} ({} bytes)\n", out.display(), bytes.len()))
}
