//! Per-artifact cache files.

use std::path::{Path, PathBuf};

use lessup_common::{write_atomic, ArtifactId};
use tracing::debug;

use crate::error::CacheError;
use crate::record::CacheRecord;

/// Reads and writes one cache record per artifact under a cache directory.
///
/// Records live at `<cache_dir>/<base>.css.cache`. Loads are fail-safe: a
/// missing, unreadable, or malformed file is a miss. Saves replace the file
/// atomically and report failures.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory holding the cache files.
    cache_dir: PathBuf,

    /// lessup version stamped into and required from every record.
    tool_version: String,
}

impl CacheStore {
    /// Creates a store rooted at `cache_dir`.
    pub fn new(cache_dir: &Path, tool_version: &str) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            tool_version: tool_version.to_string(),
        }
    }

    /// The cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the cache file path for `artifact`.
    pub fn path_for(&self, artifact: &ArtifactId) -> PathBuf {
        self.cache_dir.join(artifact.cache_file_name())
    }

    /// Loads the record for `artifact`, or `None` if there is no usable record.
    pub fn load(&self, artifact: &ArtifactId) -> Option<CacheRecord> {
        match self.try_load(artifact) {
            Ok(record) => record,
            Err(err) => {
                debug!(artifact = %artifact, reason = %err, "discarding unusable cache record");
                None
            }
        }
    }

    fn try_load(&self, artifact: &ArtifactId) -> Result<Option<CacheRecord>, CacheError> {
        let path = self.path_for(artifact);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(artifact = %artifact, "no cache record");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };
        CacheRecord::decode(&path, &raw, &self.tool_version).map(Some)
    }

    /// Writes `record` for `artifact`, replacing any previous record.
    ///
    /// Creates the cache directory if needed and returns the written path.
    pub fn save(&self, artifact: &ArtifactId, record: &CacheRecord) -> Result<PathBuf, CacheError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::Io {
            path: self.cache_dir.clone(),
            source: e,
        })?;
        let path = self.path_for(artifact);
        let bytes = record.encode(&self.tool_version)?;
        write_atomic(&path, &bytes).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;
        debug!(artifact = %artifact, path = %path.display(), size_bytes = bytes.len(), "saved cache record");
        Ok(path)
    }
}
