//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing cache records.
///
/// Reads never surface these to callers: [`CacheStore::load`] turns every
/// one of them into a miss. Writes return them so the caller can hold back
/// the matching output file.
///
/// [`CacheStore::load`]: crate::CacheStore::load
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file has an invalid or truncated header.
    #[error("invalid cache header in {path}: {reason}")]
    InvalidHeader {
        /// The cache file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: String,
        /// The checksum computed from the payload.
        actual: String,
    },

    /// The file was written with a different record format version.
    #[error("format version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The format version this build reads.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// The file was written by a different lessup release.
    #[error("cache in {path} was written by lessup {actual}, this is {expected}")]
    ToolMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The running tool version.
        expected: String,
        /// The tool version recorded in the file.
        actual: String,
    },

    /// Encoding or decoding a record failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
