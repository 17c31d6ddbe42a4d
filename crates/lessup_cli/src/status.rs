//! `lessup status`: show which stylesheets a build would recompile.

use std::io::{self, Write};

use lessup_cache::Staleness;
use lessup_config::{resolve_settings, ConfigError, Overrides};
use lessup_pipeline::{status, FsScanner};
use serde::Serialize;

use crate::{project, GlobalArgs, ReportFormat, StatusArgs};

/// One line of `status` output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path of the source file.
    pub source: String,
    /// `fresh`, `missing` or `outdated`.
    pub state: &'static str,
    /// Human-readable explanation.
    pub detail: String,
}

impl StatusEntry {
    fn new(source: String, staleness: &Staleness) -> Self {
        let state = match staleness {
            Staleness::Fresh => "fresh",
            Staleness::Missing => "missing",
            Staleness::Outdated { .. } => "outdated",
        };
        Self {
            source,
            state,
            detail: staleness.to_string(),
        }
    }
}

/// Prints the staleness of every artifact. Writes nothing to disk.
pub fn run(args: &StatusArgs, global: &GlobalArgs) -> Result<i32, ConfigError> {
    let (project_dir, config) = project::load(global)?;
    let settings = resolve_settings(&config, &project_dir, &Overrides::default())?;

    let (planned, scan_failures) = status(&settings, &FsScanner);
    for failure in &scan_failures {
        tracing::error!("{failure}");
    }
    let entries: Vec<StatusEntry> = planned
        .iter()
        .map(|(artifact, staleness)| StatusEntry::new(artifact.to_string(), staleness))
        .collect();

    let printed = emit(&mut std::io::stdout().lock(), args.format, &entries);
    Ok(exit_code(printed, scan_failures.is_empty()))
}

/// Writes `entries` to `out` in the requested format.
pub fn emit(out: &mut dyn Write, format: ReportFormat, entries: &[StatusEntry]) -> io::Result<()> {
    match format {
        ReportFormat::Text => {
            for entry in entries {
                writeln!(out, "{:<9}{}  ({})", entry.state, entry.source, entry.detail)?;
            }
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, entries)?;
            writeln!(out)?;
        }
    }
    out.flush()
}

/// A closed pipe (`lessup status | head`) ends output quietly; any other
/// write error is a failure of the command, not of the configuration.
fn exit_code(printed: io::Result<()>, scanned_all: bool) -> i32 {
    match printed {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
            tracing::error!("failed to write status: {e}");
            1
        }
        _ if scanned_all => 0,
        _ => 1,
    }
}
