//! sealbox-extract: the self-extractor embedded in every artifact
//!
//! Usage:
//!   SelfExtractor_<name> [--dest DIR] [--log-file FILE]
//!
//! Reads its own executable, finds the embedded bundle, asks for the
//! passphrase if one was set, and unpacks into the chosen directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use sealbox_bundle::{extract, locate_resource};
use sealbox_cli::fmt_bytes;
use sealbox_cli::logging::{init_logging, LogFormat};
use sealbox_cli::prompt::{passphrase_from_env, ConsolePrompt};

#[derive(Parser, Debug)]
#[command(
    name = "sealbox-extract",
    version,
    about = "Unpack the encrypted archive embedded in this executable"
)]
struct Cli {
    /// Directory to extract into (prompted for when absent)
    #[arg(long, short = 'd')]
    dest: Option<PathBuf>,

    /// Append a diagnostic log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SEALBOX_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "SEALBOX_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.log_format, cli.log_file.as_deref())?;

    let exe = std::env::current_exe().context("locating own executable")?;
    info!(exe = %exe.display(), "sealbox-extract starting");

    let image = std::fs::read(&exe).with_context(|| format!("reading {}", exe.display()))?;
    let resource = locate_resource(&image).context("this executable carries no archive")?;

    let stdin = std::io::stdin();
    let mut prompt = ConsolePrompt::new(stdin.lock(), cli.dest, passphrase_from_env());
    let report = extract(resource, &mut prompt).context("extraction failed")?;

    println!(
        "Extracted {} into {}",
        report.artifact_name,
        report.destination.display()
    );
    println!(
        "  {} files, {} directories, {}",
        report.unpacked.files,
        report.unpacked.directories,
        fmt_bytes(report.unpacked.bytes)
    );
    Ok(())
}
