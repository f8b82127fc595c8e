//! Shared plumbing for the `sealbox` and `sealbox-extract` binaries

pub mod logging;
pub mod prompt;

use anyhow::{Context, Result};
use std::path::Path;

use sealbox_core::config::SealboxConfig;

/// Load `sealbox.toml`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<SealboxConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
    } else {
        tracing::debug!("config file not found: {}  (using defaults)", path.display());
        Ok(SealboxConfig::default())
    }
}

pub fn fmt_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
