//! Source directory enumeration.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use lessup_common::{base_name, SourceEntry, Timestamp};
use tracing::debug;

/// Lists the LESS source files of a directory.
///
/// Implementations return only files whose name ends in `.less` with a
/// non-empty base name, sorted by name, each with its modification time.
pub trait SourceScanner: Sync {
    /// Scans `dir` (non-recursively).
    fn scan(&self, dir: &Path) -> io::Result<Vec<SourceEntry>>;
}

/// Scans the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScanner;

impl SourceScanner for FsScanner {
    fn scan(&self, dir: &Path) -> io::Result<Vec<SourceEntry>> {
        let mut entries: Vec<SourceEntry> = std::fs::read_dir(dir)?
            .filter_map(|entry| source_entry(entry.map(|e| e.path())))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Turns one directory listing result into a source entry, skipping
/// anything that is not a readable `.less` file.
fn source_entry(path: io::Result<PathBuf>) -> Option<SourceEntry> {
    let path = match path {
        Ok(path) => path,
        Err(e) => {
            debug!(error = %e, "skipping unreadable directory entry");
            return None;
        }
    };
    let name = path.file_name()?.to_str()?.to_string();
    base_name(&name)?;
    // Follows symlinks; dangling links are not sources.
    let meta = match std::fs::metadata(&path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable source");
            return None;
        }
    };
    if !meta.is_file() {
        return None;
    }
    let modified = meta.modified().ok()?;
    Some(SourceEntry::new(name, Timestamp::from_system_time(modified)))
}

/// An in-memory directory listing.
#[derive(Debug, Clone, Default)]
pub struct MemoryScanner {
    dirs: HashMap<PathBuf, Vec<SourceEntry>>,
}

impl MemoryScanner {
    /// Creates an empty scanner; unknown directories fail with `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file in `dir`.
    pub fn insert(&mut self, dir: impl Into<PathBuf>, name: &str, modified: Timestamp) {
        let files = self.dirs.entry(dir.into()).or_default();
        files.retain(|e| e.name != name);
        files.push(SourceEntry::new(name, modified));
    }

    /// Registers `dir` with no files.
    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.entry(dir.into()).or_default();
    }
}

impl SourceScanner for MemoryScanner {
    fn scan(&self, dir: &Path) -> io::Result<Vec<SourceEntry>> {
        let files = self.dirs.get(dir).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", dir.display()))
        })?;
        let mut entries: Vec<SourceEntry> = files
            .iter()
            .filter(|e| base_name(&e.name).is_some())
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
