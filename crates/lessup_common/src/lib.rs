//! Shared foundational types used across the lessup workspace.
//!
//! This crate provides artifact identities and file naming, modification
//! timestamps, content hashing for cache integrity, formatter modes, and
//! atomic file replacement.

#![warn(missing_docs)]

pub mod artifact;
pub mod formatter;
pub mod fs;
pub mod hash;
pub mod timestamp;

pub use artifact::{base_name, ArtifactId, SourceEntry, CACHE_EXT, OUTPUT_EXT, SOURCE_EXT};
pub use formatter::{Formatter, ParseFormatterError};
pub use fs::write_atomic;
pub use hash::ContentHash;
pub use timestamp::Timestamp;
