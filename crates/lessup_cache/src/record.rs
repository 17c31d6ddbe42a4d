//! On-disk cache record format.
//!
//! A cache file is a 4-byte little-endian header length, a bincode-encoded
//! [`RecordHeader`], and the bincode-encoded [`CacheRecord`] payload. The
//! header carries magic bytes, the format version, the lessup version that
//! wrote it, and an XXH3 checksum of the payload.

use std::path::{Path, PathBuf};

use lessup_common::{ContentHash, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Magic bytes identifying a lessup cache record.
pub const RECORD_MAGIC: [u8; 4] = *b"LSUP";

/// Current record format version. Increment on breaking changes to the
/// header or payload layout.
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// Upper bound on bytes the header decoder may claim for variable-length
/// fields. A valid header is a few dozen bytes.
const HEADER_LIMIT: usize = 256;

/// Upper bound on bytes the payload decoder may claim.
const PAYLOAD_LIMIT: usize = 256 * 1024 * 1024;

/// Header prepended to every cache record for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Magic bytes: must be `b"LSUP"`.
    pub magic: [u8; 4],

    /// Record format version.
    pub format_version: u32,

    /// lessup version that wrote the record.
    pub tool_version: String,

    /// Checksum of the encoded payload.
    pub checksum: ContentHash,
}

/// Compiled output of one source artifact together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// When the compiled output was produced.
    pub updated: Timestamp,

    /// The compiled CSS.
    pub compiled: String,

    /// Source files that contributed to the output, as reported by the compiler.
    pub sources: Vec<String>,
}

impl CacheRecord {
    /// Creates a record from compiler output.
    pub fn new(updated: Timestamp, compiled: String, sources: &[PathBuf]) -> Self {
        Self {
            updated,
            compiled,
            sources: sources
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// Encodes the record with its validation header.
    pub fn encode(&self, tool_version: &str) -> Result<Vec<u8>, CacheError> {
        let config = bincode::config::standard();
        let payload =
            bincode::serde::encode_to_vec(self, config).map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let header = RecordHeader {
            magic: RECORD_MAGIC,
            format_version: RECORD_FORMAT_VERSION,
            tool_version: tool_version.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes =
            bincode::serde::encode_to_vec(&header, config).map_err(|e| {
                CacheError::Serialization {
                    reason: e.to_string(),
                }
            })?;

        let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
            CacheError::Serialization {
                reason: "record header too large".to_string(),
            }
        })?;
        let mut out = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        out.extend_from_slice(&header_len.to_le_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Decodes and validates a record read from `path`.
    ///
    /// Every structural problem is reported as a [`CacheError`]; the store
    /// maps all of them to a miss.
    pub fn decode(path: &Path, raw: &[u8], tool_version: &str) -> Result<Self, CacheError> {
        let invalid = |reason: &str| CacheError::InvalidHeader {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let len_bytes: [u8; 4] = raw
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| invalid("missing header length"))?;
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        let header_end = 4usize
            .checked_add(header_len)
            .filter(|end| *end <= raw.len())
            .ok_or_else(|| invalid("truncated header"))?;

        // Lengths inside the header are untrusted until the checksum passes.
        let header_config = bincode::config::standard().with_limit::<HEADER_LIMIT>();
        let (header, _): (RecordHeader, usize) =
            bincode::serde::decode_from_slice(&raw[4..header_end], header_config)
                .map_err(|e| invalid(&e.to_string()))?;

        if header.magic != RECORD_MAGIC {
            return Err(invalid("bad magic bytes"));
        }
        if header.format_version != RECORD_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: RECORD_FORMAT_VERSION,
                actual: header.format_version,
            });
        }
        if header.tool_version != tool_version {
            return Err(CacheError::ToolMismatch {
                path: path.to_path_buf(),
                expected: tool_version.to_string(),
                actual: header.tool_version,
            });
        }

        let payload = &raw[header_end..];
        if payload.len() > PAYLOAD_LIMIT {
            return Err(CacheError::Serialization {
                reason: format!("record payload of {} bytes exceeds limit", payload.len()),
            });
        }
        if !header.checksum.matches(payload) {
            return Err(CacheError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: header.checksum.to_string(),
                actual: ContentHash::from_bytes(payload).to_string(),
            });
        }

        let (record, read): (CacheRecord, usize) =
            bincode::serde::decode_from_slice(
                payload,
                bincode::config::standard().with_limit::<PAYLOAD_LIMIT>(),
            )
            .map_err(|e| {
                CacheError::Serialization {
                    reason: e.to_string(),
                }
            })?;
        if read != payload.len() {
            return Err(CacheError::Serialization {
                reason: format!("{} trailing bytes after record", payload.len() - read),
            });
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION: &str = "0.1.0";

    fn record() -> CacheRecord {
        CacheRecord::new(
            Timestamp::from_secs(1_700_000_000),
            "a {\n  color: red;\n}\n".to_string(),
            &[PathBuf::from("styles/a.less")],
        )
    }

    fn frame(header: &RecordHeader, payload: &[u8]) -> Vec<u8> {
        let header_bytes =
            bincode::serde::encode_to_vec(header, bincode::config::standard()).unwrap();
        let mut out = Vec::new();
        out.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(payload);
        out
    }

    fn payload() -> Vec<u8> {
        bincode::serde::encode_to_vec(record(), bincode::config::standard()).unwrap()
    }

    #[test]
    fn encode_then_decode() {
        let bytes = record().encode(VERSION).unwrap();
        let back = CacheRecord::decode(Path::new("a.css.cache"), &bytes, VERSION).unwrap();
        assert_eq!(back, record());
        assert_eq!(back.sources, vec!["styles/a.less".to_string()]);
    }

    #[test]
    fn empty_file_is_invalid() {
        let err = CacheRecord::decode(Path::new("a"), b"", VERSION).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn truncated_header_is_invalid() {
        let bytes = record().encode(VERSION).unwrap();
        let err = CacheRecord::decode(Path::new("a"), &bytes[..6], VERSION).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn wrong_magic_is_invalid() {
        let payload = payload();
        let header = RecordHeader {
            magic: *b"PHPS",
            format_version: RECORD_FORMAT_VERSION,
            tool_version: VERSION.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let err =
            CacheRecord::decode(Path::new("a"), &frame(&header, &payload), VERSION).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn other_format_version_is_rejected() {
        let payload = payload();
        let header = RecordHeader {
            magic: RECORD_MAGIC,
            format_version: 99,
            tool_version: VERSION.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let err =
            CacheRecord::decode(Path::new("a"), &frame(&header, &payload), VERSION).unwrap_err();
        assert!(matches!(
            err,
            CacheError::VersionMismatch { actual: 99, .. }
        ));
    }

    #[test]
    fn other_tool_version_is_rejected() {
        let bytes = record().encode("0.0.9").unwrap();
        let err = CacheRecord::decode(Path::new("a"), &bytes, VERSION).unwrap_err();
        assert!(matches!(err, CacheError::ToolMismatch { .. }));
    }

    /// Frames raw header bytes that bincode would read as a string of `len` bytes.
    fn header_claiming_string_of(len: u64) -> Vec<u8> {
        let mut header = RECORD_MAGIC.to_vec();
        header.push(RECORD_FORMAT_VERSION as u8);
        header.push(0xfd);
        header.extend_from_slice(&len.to_le_bytes());
        let mut out = (header.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&header);
        out
    }

    #[test]
    fn oversized_tool_version_length_is_invalid() {
        let bytes = header_claiming_string_of(1 << 46);
        let err = CacheRecord::decode(Path::new("a"), &bytes, VERSION).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn tampered_payload_fails_checksum() {
        let mut bytes = record().encode(VERSION).unwrap();
        let last = bytes.len() - 2;
        bytes[last] ^= 0xff;
        let err = CacheRecord::decode(Path::new("a"), &bytes, VERSION).unwrap_err();
        assert!(matches!(err, CacheError::ChecksumMismatch { .. }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut payload = payload();
        payload.push(0);
        let header = RecordHeader {
            magic: RECORD_MAGIC,
            format_version: RECORD_FORMAT_VERSION,
            tool_version: VERSION.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let err =
            CacheRecord::decode(Path::new("a"), &frame(&header, &payload), VERSION).unwrap_err();
        assert!(matches!(err, CacheError::Serialization { .. }));
    }
}
