//! Source artifact identities and the file names derived from them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::timestamp::Timestamp;

/// Extension of LESS source files.
pub const SOURCE_EXT: &str = ".less";

/// Extension appended to the base name for compiled output.
pub const OUTPUT_EXT: &str = ".css";

/// Extension appended to the base name for cache records.
pub const CACHE_EXT: &str = ".css.cache";

/// Strips the source extension from a file name.
///
/// Returns `None` if `file_name` does not end in [`SOURCE_EXT`] or if nothing
/// remains once it is removed (a file literally named `.less`).
pub fn base_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(SOURCE_EXT)
        .filter(|base| !base.is_empty())
}

/// Identity of one source artifact: the directory it lives in and its file name.
///
/// The base name (file name minus [`SOURCE_EXT`]) keys both the output file
/// and the cache record, so two directories holding a file of the same name
/// map to the same output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    source_dir: PathBuf,
    file_name: String,
}

impl ArtifactId {
    /// Creates an identity for `file_name` inside `source_dir`.
    ///
    /// Returns `None` when the file name has no usable base name.
    pub fn new(source_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Option<Self> {
        let file_name = file_name.into();
        base_name(&file_name)?;
        Some(Self {
            source_dir: source_dir.into(),
            file_name,
        })
    }

    /// The directory containing the source file.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// The source file name, including its extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The file name with the source extension stripped.
    pub fn base_name(&self) -> &str {
        // Checked in `new`.
        base_name(&self.file_name).unwrap_or(&self.file_name)
    }

    /// Full path of the source file.
    pub fn source_path(&self) -> PathBuf {
        self.source_dir.join(&self.file_name)
    }

    /// File name of the compiled output, e.g. `site.css`.
    pub fn output_file_name(&self) -> String {
        format!("{}{OUTPUT_EXT}", self.base_name())
    }

    /// File name of the cache record, e.g. `site.css.cache`.
    pub fn cache_file_name(&self) -> String {
        format!("{}{CACHE_EXT}", self.base_name())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_path().display())
    }
}

/// A scanned source file: its name and last modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File name within the scanned directory.
    pub name: String,
    /// Last modification time reported by the filesystem.
    pub modified: Timestamp,
}

impl SourceEntry {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, modified: Timestamp) -> Self {
        Self {
            name: name.into(),
            modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_extension() {
        assert_eq!(base_name("site.less"), Some("site"));
        assert_eq!(base_name("theme.dark.less"), Some("theme.dark"));
    }

    #[test]
    fn base_name_rejects_other_files() {
        assert_eq!(base_name("site.css"), None);
        assert_eq!(base_name(".less"), None);
        assert_eq!(base_name("lessfile"), None);
    }

    #[test]
    fn derived_file_names() {
        let id = ArtifactId::new("styles", "site.less").unwrap();
        assert_eq!(id.base_name(), "site");
        assert_eq!(id.output_file_name(), "site.css");
        assert_eq!(id.cache_file_name(), "site.css.cache");
        assert_eq!(id.source_path(), Path::new("styles").join("site.less"));
    }

    #[test]
    fn new_rejects_non_source() {
        assert!(ArtifactId::new("styles", "readme.md").is_none());
    }

    #[test]
    fn display_is_source_path() {
        let id = ArtifactId::new("styles", "a.less").unwrap();
        assert_eq!(id.to_string(), Path::new("styles").join("a.less").display().to_string());
    }
}
