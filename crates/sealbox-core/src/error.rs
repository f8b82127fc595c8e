use std::path::PathBuf;

use thiserror::Error;

pub type SealResult<T> = Result<T, SealError>;

#[derive(Debug, Error)]
pub enum SealError {
    #[error("selection too large: {total} bytes exceeds the {max} byte ceiling")]
    SizeExceeded { total: u64, max: u64 },

    #[error("no files or directories were selected")]
    SelectionEmpty,

    #[error("path does not exist: {}", .0.display())]
    MissingPath(PathBuf),

    #[error("embedded payload is malformed: {len} bytes (minimum 17)")]
    MalformedBlob { len: usize },

    #[error("decryption failed: wrong passphrase or corrupted payload")]
    DecryptionFailed,

    #[error("passphrase does not match")]
    InvalidKey,

    #[error("no destination directory selected")]
    NoDestination,

    #[error("archive entry escapes the destination: {0}")]
    UnsafeEntry(String),

    #[error("bundle error: {0}")]
    Bundle(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SealError {
    /// Short machine-friendly name of the failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            SealError::SizeExceeded { .. } => "size_exceeded",
            SealError::SelectionEmpty => "selection_empty",
            SealError::MissingPath(_) => "missing_path",
            SealError::MalformedBlob { .. } => "malformed_blob",
            SealError::DecryptionFailed => "decryption_failed",
            SealError::InvalidKey => "invalid_key",
            SealError::NoDestination => "no_destination",
            SealError::UnsafeEntry(_) => "unsafe_entry",
            SealError::Bundle(_) => "bundle",
            SealError::Config(_) => "config",
            SealError::Archive(_) => "archive",
            SealError::Io(_) => "io",
        }
    }
}
