//! sealbox: build encrypted self-extracting artifacts
//!
//! Commands:
//!   pack <paths..> --out <dir>  - seal files and directories into an artifact
//!   inspect <artifact>          - show the metadata embedded in an artifact
//!   config show                 - display the effective configuration

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use sealbox_archive::{CapacityGate, PackOptions};
use sealbox_bundle::{
    artifact_file_name, default_artifact_name, locate_resource, parse, seal, ArtifactBuilder,
    SealRequest, StubArtifactBuilder,
};
use sealbox_cli::logging::{init_logging, LogFormat};
use sealbox_cli::prompt::read_new_passphrase;
use sealbox_cli::{fmt_bytes, load_config};
use sealbox_core::config::SealboxConfig;
use sealbox_core::{Selection, Timestamp};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "sealbox",
    version,
    about = "Encrypted self-extracting archives",
    long_about = "sealbox: pack files and directories into a single passphrase-protected executable"
)]
struct Cli {
    /// Path to sealbox.toml configuration file
    #[arg(long, short = 'c', env = "SEALBOX_CONFIG", default_value = "sealbox.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides [log] level
    #[arg(long, env = "SEALBOX_LOG")]
    log: Option<String>,

    /// Log format; overrides [log] format
    #[arg(long, env = "SEALBOX_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seal files and directories into a self-extracting artifact
    ///
    /// The passphrase is read from SEALBOX_PASSPHRASE or prompted for.
    Pack {
        /// Files and directories to include, in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory (created if missing)
        #[arg(long, short = 'o')]
        out: PathBuf,
        /// Artifact name (default: name of the first path)
        #[arg(long, short = 'n')]
        name: Option<String>,
        /// Do not ask for a passphrase
        #[arg(long)]
        no_passphrase: bool,
    },

    /// Show the metadata embedded in an artifact
    Inspect {
        artifact: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = cli.log.as_deref().unwrap_or(&config.log.level);
    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.log.format));
    init_logging(level, format, None)?;

    match cli.command {
        Commands::Pack {
            paths,
            out,
            name,
            no_passphrase,
        } => cmd_pack(&config, &paths, &out, name, no_passphrase),
        Commands::Inspect { artifact, json } => cmd_inspect(&artifact, json),
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

// ── Progress helpers ──────────────────────────────────────────────────────────

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Extractor executable to embed: config override, else the `sealbox-extract`
/// installed next to this binary.
fn resolve_extractor_stub(config: &SealboxConfig) -> Result<PathBuf> {
    let stub = match &config.builder.extractor_stub {
        Some(path) => path.clone(),
        None => {
            let exe = std::env::current_exe().context("locating sealbox executable")?;
            let dir = exe
                .parent()
                .context("sealbox executable has no parent directory")?;
            dir.join(format!("sealbox-extract{}", std::env::consts::EXE_SUFFIX))
        }
    };
    if !stub.is_file() {
        bail!(
            "extractor stub not found: {}\n\
             Build it with `cargo build --release --bin sealbox-extract` or set\n\
             [builder] extractor_stub in the config file.",
            stub.display()
        );
    }
    Ok(stub)
}

// ── `sealbox pack` ────────────────────────────────────────────────────────────

fn cmd_pack(
    config: &SealboxConfig,
    paths: &[PathBuf],
    out: &Path,
    name: Option<String>,
    no_passphrase: bool,
) -> Result<()> {
    let selections = paths
        .iter()
        .map(|p| Selection::resolve(p).with_context(|| format!("selecting {}", p.display())))
        .collect::<Result<Vec<_>>>()?;

    let artifact_name = match name {
        Some(name) => name,
        None => default_artifact_name(&selections)?,
    };
    let gate = CapacityGate::from_config(&config.capacity);
    println!("Size limit: {}", fmt_bytes(gate.max_bytes()));

    // Resolve everything that can fail cheaply before asking for a passphrase
    let stub = resolve_extractor_stub(config)?;
    let passphrase = if no_passphrase {
        SecretString::from("")
    } else {
        read_new_passphrase().context("reading passphrase")?
    };

    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output directory: {}", out.display()))?;
    let output = out.join(artifact_file_name(
        &config.archive.artifact_prefix,
        &artifact_name,
    ));

    let pb = make_spinner("pack");
    pb.set_message(format!("sealing {artifact_name}..."));

    let request = SealRequest {
        selections,
        passphrase,
        artifact_name,
        timestamp: Timestamp::now(),
        gate,
        pack: PackOptions {
            compression: config.archive.compression,
        },
    };
    let sealed = match seal(&request) {
        Ok(sealed) => sealed,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e).context("sealing selection");
        }
    };

    pb.set_message("writing artifact...");
    let resource = sealed.to_resource().context("encoding bundle")?;
    StubArtifactBuilder::new(&stub)
        .build(&resource, &output)
        .with_context(|| format!("writing artifact: {}", output.display()))?;
    pb.finish_with_message("done".to_string());

    info!(output = %output.display(), "artifact written");
    println!();
    println!("Artifact created:");
    println!("  path:       {}", output.display());
    println!("  name:       {}", sealed.metadata.artifact_name);
    println!("  payload:    {}", fmt_bytes(sealed.metadata.payload_size));
    println!("  encrypted:  {}", fmt_bytes(sealed.blob.len() as u64));
    println!(
        "  passphrase: {}",
        if sealed.metadata.has_challenge() { "yes" } else { "no" }
    );
    Ok(())
}

// ── `sealbox inspect` ─────────────────────────────────────────────────────────

fn cmd_inspect(artifact: &Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(artifact)
        .with_context(|| format!("reading artifact: {}", artifact.display()))?;
    let resource = locate_resource(&bytes)
        .with_context(|| format!("not a sealbox artifact: {}", artifact.display()))?;
    let bundle = parse(resource).context("parsing embedded bundle")?;
    let meta = &bundle.metadata;

    // The challenge is the passphrase in reversible form; never print it
    if json {
        let value = serde_json::json!({
            "version": meta.version,
            "artifact_name": meta.artifact_name,
            "payload_size": meta.payload_size,
            "timestamp": meta.timestamp,
            "passphrase": meta.has_challenge(),
            "encrypted_size": bundle.blob.len(),
        });
        let rendered = serde_json::to_string_pretty(&value).context("serializing metadata")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Artifact:   {}", artifact.display());
    println!("  version:    {}", meta.version);
    println!("  name:       {}", meta.artifact_name);
    println!("  payload:    {}", fmt_bytes(meta.payload_size));
    println!("  timestamp:  {}", meta.timestamp.ticks());
    println!("  encrypted:  {}", fmt_bytes(bundle.blob.len() as u64));
    println!(
        "  passphrase: {}",
        if meta.has_challenge() { "yes" } else { "no" }
    );
    Ok(())
}

// ── `sealbox config show` ─────────────────────────────────────────────────────

fn cmd_config_show(config: &SealboxConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!(
            "# Configuration: defaults (no file at {})",
            config_path.display()
        );
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pack_arguments() {
        let cli = Cli::try_parse_from([
            "sealbox",
            "pack",
            "notes.txt",
            "photos",
            "--out",
            "dist",
            "--name",
            "bundle",
            "--no-passphrase",
        ])
        .unwrap();

        match cli.command {
            Commands::Pack {
                paths,
                out,
                name,
                no_passphrase,
            } => {
                assert_eq!(paths, vec![PathBuf::from("notes.txt"), PathBuf::from("photos")]);
                assert_eq!(out, PathBuf::from("dist"));
                assert_eq!(name.as_deref(), Some("bundle"));
                assert!(no_passphrase);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pack_requires_paths_and_out() {
        assert!(Cli::try_parse_from(["sealbox", "pack", "--out", "dist"]).is_err());
        assert!(Cli::try_parse_from(["sealbox", "pack", "notes.txt"]).is_err());
    }

    #[test]
    fn configured_stub_must_exist() {
        let mut config = SealboxConfig::default();
        config.builder.extractor_stub = Some(PathBuf::from("/nonexistent/sealbox-extract"));
        assert!(resolve_extractor_stub(&config).is_err());
    }
}
