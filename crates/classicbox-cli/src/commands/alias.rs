use super::{AliasCommands, read_input};
use anyhow::{Context, Result, bail};
use classicbox_formats::alias::{alias_record_to_bytes, describe_alias_record, read_alias_record};
use std::io::Cursor;
use std::path::Path;

pub fn handle(cmd: AliasCommands) -> Result<String> {
    match cmd {
        AliasCommands::Info { file } => info(&file),
        AliasCommands::Verify { file } => verify(&file),
    }
}

fn info(file: &Path) -> Result<String> {
    let bytes = read_input(file)?;
    let record = read_alias_record(&mut Cursor::new(bytes))
        .with_context(|| format!("failed to decode alias record in {}", file.display()))?;
    Ok(describe_alias_record(&record))
}

fn verify(file: &Path) -> Result<String> {
    let bytes = read_input(file)?;
    let record = read_alias_record(&mut Cursor::new(&bytes))
        .with_context(|| format!("failed to decode alias record in {}", file.display()))?;
    let rebuilt = alias_record_to_bytes(&record).context("failed to re-encode alias record")?;
    if rebuilt != bytes {
        bail!(
            "re-encoded alias record differs: {} bytes in, {} bytes out",
            bytes.len(),
            rebuilt.len()
        );
    }
    Ok(format!("{}: alias record round-trips ({} bytes)\n", file.display(), bytes.len()))
}
