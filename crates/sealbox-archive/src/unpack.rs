//! ZIP container → files on disk
//!
//! Entries are written in container order. A failure on any entry stops the
//! run; entries already written stay on disk.

use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use sealbox_core::{ArchiveEntry, SealError, SealResult};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnpackReport {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Read every entry of a container into memory, in container order.
pub fn read_entries(container: &[u8]) -> SealResult<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(container))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().trim_end_matches('/').to_string();
        if file.is_dir() {
            entries.push(ArchiveEntry::directory(name));
        } else {
            let mut payload = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut payload)?;
            entries.push(ArchiveEntry::file(name, payload));
        }
    }

    Ok(entries)
}

/// Extract a container under `dest`, overwriting existing files.
///
/// Entry names that would resolve outside `dest` (absolute paths, `..`) are
/// rejected with `UnsafeEntry`.
pub fn unpack(container: &[u8], dest: &Path) -> SealResult<UnpackReport> {
    let mut archive = ZipArchive::new(Cursor::new(container))?;
    let mut report = UnpackReport::default();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let relative = file
            .enclosed_name()
            .ok_or_else(|| SealError::UnsafeEntry(file.name().to_string()))?;
        let out_path = dest.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&out_path)?;
            report.directories += 1;
            debug!(path = %out_path.display(), "created directory");
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        let written = std::io::copy(&mut file, &mut out)?;
        report.files += 1;
        report.bytes += written;
        debug!(path = %out_path.display(), bytes = written, "wrote file");
    }

    info!(
        dest = %dest.display(),
        files = report.files,
        directories = report.directories,
        bytes = report.bytes,
        "unpacked container"
    );
    Ok(report)
}
