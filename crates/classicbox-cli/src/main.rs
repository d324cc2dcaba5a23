//! `classicbox` command-line front end
//!
//! Each subcommand loads its input fully, calls one codec from
//! `classicbox-formats` and prints or writes the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AliasCommands, MacBinaryCommands, RsrcCommands};

#[derive(Parser)]
#[command(
    name = "classicbox",
    about = "Inspect and build classic Mac OS alias records, resource forks and MacBinary files",
    version
)]
struct Cli {
    /// Logging level, overridden by RUST_LOG
    #[arg(short, long, value_enum, env = "CLASSICBOX_LOG", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Alias records
    #[command(subcommand)]
    Alias(AliasCommands),

    /// Resource forks
    #[command(subcommand)]
    Rsrc(RsrcCommands),

    /// MacBinary envelopes
    #[command(subcommand)]
    Macbinary(MacBinaryCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.directive())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = match cli.command {
        Commands::Alias(cmd) => commands::alias::handle(cmd)?,
        Commands::Rsrc(cmd) => commands::rsrc::handle(cmd)?,
        Commands::Macbinary(cmd) => commands::macbinary::handle(cmd)?,
    };
    print!("{output}");

    Ok(())
}
