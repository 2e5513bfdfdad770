//! License file locator.
//!
//! Walks from a package's source directory upward until a file with a
//! recognized license name appears. "No license anywhere in the ancestry"
//! is a normal outcome, not an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Recognized license file names, matched case-insensitively against
/// directory entries.
pub const LICENSE_FILE_NAMES: &[&str] = &[
    "LICENSE",
    "LICENSE.txt",
    "LICENSE.md",
    "LICENSE.rst",
    "LICENCE",
    "LICENCE.txt",
    "COPYING",
    "COPYING.txt",
    "UNLICENSE",
];

/// Find the license file covering `dir`: the first match at the nearest
/// ancestor, bounded by the filesystem root.
pub fn find(dir: &Path) -> Option<PathBuf> {
    let mut current = Some(dir);
    while let Some(d) = current {
        if let Some(found) = license_in(d) {
            return Some(found);
        }
        current = d.parent();
    }
    None
}

fn license_in(dir: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("skipping unreadable directory {}: {}", dir.display(), err);
            return None;
        }
    };

    let mut names: Vec<std::ffi::OsString> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name())
        .collect();
    names.sort();

    for candidate in LICENSE_FILE_NAMES {
        for name in &names {
            if name.to_string_lossy().eq_ignore_ascii_case(candidate) {
                return Some(dir.join(name));
            }
        }
    }
    None
}

/// Per-scan memo of directory -> located license path. Construct one per
/// scan and discard it with the scan; directories may change on disk
/// between scans.
#[derive(Debug, Default)]
pub struct LicenseCache {
    entries: HashMap<PathBuf, Option<PathBuf>>,
}

impl LicenseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&mut self, dir: &Path) -> Option<PathBuf> {
        if let Some(cached) = self.entries.get(dir) {
            return cached.clone();
        }
        let result = find(dir);
        self.entries.insert(dir.to_path_buf(), result.clone());
        result
    }
}
