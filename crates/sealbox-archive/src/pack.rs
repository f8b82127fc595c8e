//! Selection packing into an in-memory ZIP container
//!
//! Every selection contributes exactly one top-level entry, in input order:
//!   - a file becomes `<name>`
//!   - a directory becomes a `<name>/` marker followed by its contents as
//!     `<name>/<relative/path>`, with a marker for every nested directory so
//!     empty directories survive extraction
//!
//! Directory contents are enumerated sorted by file name and every ZIP entry
//! carries the same fixed timestamp, so the logical entry set is reproducible.

use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use sealbox_core::config::Compression;
use sealbox_core::{SealError, SealResult, Selection, SelectionKind};

use crate::naming::NameAllocator;

#[derive(Debug, Clone, Copy)]
pub struct PackOptions {
    pub compression: Compression,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
        }
    }
}

/// One entry the packer will write, before any file contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// `/`-separated entry name, without a trailing slash
    pub name: String,
    pub is_dir: bool,
    /// Source on disk
    pub source: PathBuf,
    /// File size at planning time; 0 for directories
    pub size: u64,
}

/// A serialized container plus its logical size
#[derive(Debug)]
pub struct PackedContainer {
    /// ZIP bytes
    pub bytes: Vec<u8>,
    /// Sum of uncompressed file sizes
    pub payload_size: u64,
    /// Number of entries written, directory markers included
    pub entries: usize,
}

/// Walk the selections and decide every entry name without reading contents.
pub fn plan(selections: &[Selection]) -> SealResult<Vec<PlannedEntry>> {
    if selections.is_empty() {
        return Err(SealError::SelectionEmpty);
    }

    let mut names = NameAllocator::new();
    let mut planned = Vec::new();

    for selection in selections {
        let top = names.allocate(&selection.base_name());
        match selection.kind {
            SelectionKind::File => {
                let size = std::fs::metadata(&selection.path)?.len();
                planned.push(PlannedEntry {
                    name: top,
                    is_dir: false,
                    source: selection.path.clone(),
                    size,
                });
            }
            SelectionKind::Directory => {
                plan_directory(&selection.path, &top, &mut planned)?;
            }
        }
    }

    Ok(planned)
}

fn plan_directory(root: &Path, top: &str, out: &mut Vec<PlannedEntry>) -> SealResult<()> {
    out.push(PlannedEntry {
        name: top.to_string(),
        is_dir: true,
        source: root.to_path_buf(),
        size: 0,
    });

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| SealError::UnsafeEntry(entry.path().display().to_string()))?;
        let name = format!("{top}/{}", to_entry_path(relative));

        if entry.file_type().is_dir() {
            out.push(PlannedEntry {
                name,
                is_dir: true,
                source: entry.path().to_path_buf(),
                size: 0,
            });
        } else {
            let size = entry.metadata().map_err(std::io::Error::from)?.len();
            out.push(PlannedEntry {
                name,
                is_dir: false,
                source: entry.path().to_path_buf(),
                size,
            });
        }
    }

    Ok(())
}

/// Join path components with `/` regardless of the host separator.
fn to_entry_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Total uncompressed size of the selections, for the capacity gate.
pub fn measure(selections: &[Selection]) -> SealResult<u64> {
    Ok(plan(selections)?.iter().map(|e| e.size).sum())
}

/// Pack the selections into a ZIP container held in memory.
///
/// Any unreadable path aborts the whole operation; no partial container is
/// returned.
pub fn pack(selections: &[Selection], options: &PackOptions) -> SealResult<PackedContainer> {
    let planned = plan(selections)?;
    let method = match options.compression {
        Compression::Deflated => CompressionMethod::Deflated,
        Compression::Stored => CompressionMethod::Stored,
    };
    let base_options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut payload_size = 0u64;

    for entry in &planned {
        if entry.is_dir {
            zip.add_directory(format!("{}/", entry.name), base_options)?;
            debug!(entry = %entry.name, "packed directory");
            continue;
        }

        let options = base_options.large_file(entry.size >= u64::from(u32::MAX));
        zip.start_file(entry.name.as_str(), options)?;
        let mut source = File::open(&entry.source)?;
        let copied = std::io::copy(&mut source, &mut zip)?;
        payload_size += copied;
        debug!(entry = %entry.name, bytes = copied, "packed file");
    }

    let bytes = zip.finish()?.into_inner();

    info!(
        entries = planned.len(),
        payload_size,
        container = bytes.len(),
        "packed selection"
    );

    Ok(PackedContainer {
        bytes,
        payload_size,
        entries: planned.len(),
    })
}
