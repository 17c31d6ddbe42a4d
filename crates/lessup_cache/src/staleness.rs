//! Staleness decisions for cached artifacts.
//!
//! A record is compared against the newest modification time of *every*
//! source file in the artifact's directory, not just the artifact itself:
//! LESS files in one directory import each other freely, so any sibling edit
//! may change any output. Equal timestamps count as fresh.

use std::fmt;

use lessup_common::{SourceEntry, Timestamp};

use crate::record::CacheRecord;

/// Summary of a source directory relevant to staleness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceState {
    /// Newest modification time among the directory's source files, if any.
    pub newest: Option<Timestamp>,
}

impl SourceState {
    /// Builds the state from a set of modification times.
    pub fn from_times(times: impl IntoIterator<Item = Timestamp>) -> Self {
        Self {
            newest: times.into_iter().max(),
        }
    }

    /// Builds the state from a directory listing.
    pub fn from_entries(entries: &[SourceEntry]) -> Self {
        Self::from_times(entries.iter().map(|e| e.modified))
    }
}

/// Outcome of comparing a cache record with its source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// No usable record exists.
    Missing,
    /// A sibling source file changed after the record was produced.
    Outdated {
        /// Newest sibling modification time.
        newest: Timestamp,
        /// Provenance time of the record.
        updated: Timestamp,
    },
    /// The record is at least as new as every sibling.
    Fresh,
}

impl Staleness {
    /// Whether the artifact must be recompiled.
    pub fn is_stale(self) -> bool {
        !matches!(self, Staleness::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Missing => f.write_str("no cache record"),
            Staleness::Outdated { newest, updated } => {
                write!(f, "sources modified at {newest}, cache from {updated}")
            }
            Staleness::Fresh => f.write_str("up to date"),
        }
    }
}

/// Classifies `record` against the current `state` of its source directory.
pub fn evaluate(record: Option<&CacheRecord>, state: &SourceState) -> Staleness {
    let Some(record) = record else {
        return Staleness::Missing;
    };
    match state.newest {
        Some(newest) if newest > record.updated => Staleness::Outdated {
            newest,
            updated: record.updated,
        },
        _ => Staleness::Fresh,
    }
}

/// Returns `true` if the artifact must be recompiled.
pub fn is_stale(record: Option<&CacheRecord>, state: &SourceState) -> bool {
    evaluate(record, state).is_stale()
}
