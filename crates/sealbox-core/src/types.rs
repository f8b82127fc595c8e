use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{SealError, SealResult};

/// Whether a selected path is a single file or a directory tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionKind {
    File,
    Directory,
}

/// One user-selected path, resolved to an absolute location that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub kind: SelectionKind,
}

impl Selection {
    /// Resolve `path` against the current directory and classify it.
    pub fn resolve(path: impl AsRef<Path>) -> SealResult<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path)?;
        let meta = match std::fs::metadata(&absolute) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SealError::MissingPath(absolute));
            }
            Err(e) => return Err(e.into()),
        };
        let kind = if meta.is_dir() {
            SelectionKind::Directory
        } else {
            SelectionKind::File
        };
        Ok(Self { path: absolute, kind })
    }

    /// Final path component, used as the top-level entry name before dedup.
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    }
}

/// A single logical entry in the archive container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path; directory markers keep a trailing `/` only on the wire
    pub name: String,
    pub is_dir: bool,
    /// File contents; `None` for directory markers
    pub payload: Option<Vec<u8>>,
}

impl ArchiveEntry {
    pub fn file(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            payload: Some(payload),
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            payload: None,
        }
    }
}

/// 64-bit tick count: 100ns intervals since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const TICKS_PER_SECOND: i64 = 10_000_000;

    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let ticks = elapsed.as_secs() as i64 * Self::TICKS_PER_SECOND
            + i64::from(elapsed.subsec_nanos() / 100);
        Self(ticks)
    }

    pub fn ticks(&self) -> i64 {
        self.0
    }
}

/// Unencrypted metadata shipped next to the encrypted blob.
///
/// Everything needed to re-derive the key except the passphrase itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Metadata format version
    pub version: u32,
    /// Name the artifact was generated for (also key material)
    pub artifact_name: String,
    /// Total uncompressed payload size in bytes
    pub payload_size: u64,
    /// Generation time
    pub timestamp: Timestamp,
    /// Reversible encoding of the passphrase; empty means no passphrase
    #[serde(default)]
    pub challenge: String,
}

impl BundleMetadata {
    pub const VERSION: u32 = 1;

    pub fn has_challenge(&self) -> bool {
        !self.challenge.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_classifies_files_and_directories() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let sel = Selection::resolve(&file).unwrap();
        assert_eq!(sel.kind, SelectionKind::File);
        assert_eq!(sel.base_name(), "a.txt");

        let sel = Selection::resolve(tmp.path()).unwrap();
        assert_eq!(sel.kind, SelectionKind::Directory);
        assert!(sel.path.is_absolute());
    }

    #[test]
    fn resolve_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let err = Selection::resolve(tmp.path().join("ghost")).unwrap_err();
        assert!(matches!(err, SealError::MissingPath(_)));
    }

    #[test]
    fn timestamp_now_is_after_2020() {
        // 2020-01-01T00:00:00Z in ticks
        let y2020 = 1_577_836_800 * Timestamp::TICKS_PER_SECOND;
        assert!(Timestamp::now().ticks() > y2020);
    }

    #[test]
    fn metadata_without_challenge_field_parses() {
        let json = r#"{"version":1,"artifact_name":"a.txt","payload_size":5,"timestamp":42}"#;
        let meta: BundleMetadata = serde_json::from_str(json).unwrap();
        assert!(!meta.has_challenge());
        assert_eq!(meta.timestamp, Timestamp::from_ticks(42));
    }
}
