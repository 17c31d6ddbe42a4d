//! Incremental compilation cache for LESS sources.
//!
//! One cache record per source artifact pairs the compiled CSS with the time
//! it was produced. [`CacheStore`] persists records fail-safe (a damaged file
//! reads as a miss), and the [`staleness`] module decides from the record and
//! the sibling modification times whether an artifact must be rebuilt.

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod staleness;
pub mod store;

pub use error::CacheError;
pub use record::CacheRecord;
pub use staleness::{evaluate, is_stale, SourceState, Staleness};
pub use store::CacheStore;
