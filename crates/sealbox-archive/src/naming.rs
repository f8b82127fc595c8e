//! Top-level entry name allocation
//!
//! Names are compared case-insensitively. A taken name gets ` (n)` inserted
//! before its extension, with `n` counting up from 2:
//! `report.txt`, `report (2).txt`, `report (3).txt`.

use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve and return a unique name derived from `base`.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_lowercase()) {
            return base.to_string();
        }
        let mut n = 2u32;
        loop {
            let candidate = with_suffix(base, n);
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// `"report.txt", 2` → `"report (2).txt"`; names without an extension get
/// the suffix appended.
pub fn with_suffix(base: &str, n: u32) -> String {
    let path = Path::new(base);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{} ({n}).{}",
            stem.to_string_lossy(),
            ext.to_string_lossy()
        ),
        _ => format!("{base} ({n})"),
    }
}
