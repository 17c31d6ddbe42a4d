//! Checksums guarding cache files against torn writes and bit rot.
//!
//! A cache record's header stores the digest of the payload that follows it;
//! the payload is only deserialized after [`ContentHash::matches`] agrees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// XXH3-128 digest of a serialized cache record payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes the XXH3-128 digest of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// `true` if `data` hashes to this digest.
    pub fn matches(&self, data: &[u8]) -> bool {
        *self == Self::from_bytes(data)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
