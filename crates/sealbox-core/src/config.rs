use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 1 GiB, the ceiling used when available memory cannot be queried
pub const DEFAULT_FALLBACK_BYTES: u64 = 1024 * 1024 * 1024;

/// Top-level configuration (loaded from sealbox.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SealboxConfig {
    pub capacity: CapacityConfig,
    pub archive: ArchiveConfig,
    pub builder: BuilderConfig,
    pub log: LogConfig,
}

/// Limits applied to a selection before it is packed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Share of currently available memory a payload may use (default: 0.8)
    pub memory_fraction: f64,
    /// Ceiling when system memory cannot be queried (default: 1 GiB)
    pub fallback_bytes: u64,
    /// Hard ceiling that replaces the memory-based one when set
    pub max_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Deflated,
    Stored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Container compression: "deflated" or "stored"
    pub compression: Compression,
    /// File name prefix of generated artifacts
    pub artifact_prefix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Prebuilt extractor executable (default: `sealbox-extract` next to `sealbox`)
    pub extractor_stub: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            memory_fraction: 0.8,
            fallback_bytes: DEFAULT_FALLBACK_BYTES,
            max_bytes: None,
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            artifact_prefix: "SelfExtractor_".into(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}
