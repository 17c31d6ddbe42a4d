//! The recompilation loop.
//!
//! For each candidate artifact: load its cache record, compare it with the
//! newest modification time in its source directory, and if stale compile,
//! save the new record, then write the CSS. The record is always written
//! before the CSS: a crash in between leaves an output without a matching
//! record at worst, which the next run sees as a miss and rebuilds.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lessup_cache::{evaluate, CacheRecord, CacheStore, SourceState, Staleness};
use lessup_common::{write_atomic, ArtifactId, SourceEntry};
use lessup_compiler::Compiler;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::permissions::PermissionSetter;
use crate::report::{
    ArtifactFailure, ArtifactOutcome, BuildReport, CompiledArtifact, FailureKind, ScanFailure,
};
use crate::scanner::SourceScanner;

/// One scanned source directory.
#[derive(Debug, Clone)]
pub struct SourceDir {
    /// The directory.
    pub dir: PathBuf,
    /// Its `.less` files.
    pub entries: Vec<SourceEntry>,
}

/// Scans every directory in `dirs`, collecting failures instead of stopping.
pub fn scan_sources(
    scanner: &dyn SourceScanner,
    dirs: &[PathBuf],
) -> (Vec<SourceDir>, Vec<ScanFailure>) {
    let mut sources = Vec::with_capacity(dirs.len());
    let mut failures = Vec::new();
    for dir in dirs {
        match scanner.scan(dir) {
            Ok(entries) => {
                debug!(dir = %dir.display(), entry_count = entries.len(), "scanned source directory");
                sources.push(SourceDir {
                    dir: dir.clone(),
                    entries,
                });
            }
            Err(source) => {
                warn!(dir = %dir.display(), error = %source, "failed to scan source directory");
                failures.push(ScanFailure {
                    dir: dir.clone(),
                    source,
                });
            }
        }
    }
    (sources, failures)
}

/// An artifact paired with the state of its source directory.
#[derive(Debug, Clone)]
struct Job {
    artifact: ArtifactId,
    state: SourceState,
}

/// Expands scanned directories into jobs, in directory then file order.
///
/// Files in different directories that share a base name would write the
/// same output; the first directory in configuration order keeps it and the
/// later files are returned separately as shadowed.
fn collect_jobs(sources: &[SourceDir]) -> (Vec<Job>, Vec<ArtifactId>) {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut jobs = Vec::new();
    let mut shadowed = Vec::new();
    for source in sources {
        let state = SourceState::from_entries(&source.entries);
        for entry in &source.entries {
            let Some(artifact) = ArtifactId::new(&source.dir, entry.name.as_str()) else {
                continue;
            };
            match owners.entry(artifact.base_name().to_string()) {
                Entry::Occupied(owner) => {
                    warn!(
                        artifact = %artifact,
                        owner = %owner.get().join(&entry.name).display(),
                        "skipping source whose output name is already taken"
                    );
                    shadowed.push(artifact);
                }
                Entry::Vacant(slot) => {
                    slot.insert(source.dir.clone());
                    jobs.push(Job { artifact, state });
                }
            }
        }
    }
    (jobs, shadowed)
}

/// Classifies every artifact without compiling or writing anything.
pub fn plan(store: &CacheStore, sources: &[SourceDir]) -> Vec<(ArtifactId, Staleness)> {
    collect_jobs(sources)
        .0
        .into_iter()
        .map(|job| {
            let record = store.load(&job.artifact);
            let staleness = evaluate(record.as_ref(), &job.state);
            (job.artifact, staleness)
        })
        .collect()
}

/// Run-level switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Mode applied to each written CSS file.
    pub target_mode: Option<u32>,
    /// Process artifacts on the rayon thread pool.
    pub parallel: bool,
}

/// Drives recompilation of stale artifacts.
pub struct Orchestrator<'a> {
    target_dir: PathBuf,
    store: CacheStore,
    compiler: &'a dyn Compiler,
    permissions: &'a dyn PermissionSetter,
    options: BuildOptions,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator writing CSS into `target_dir` and records into `store`.
    pub fn new(
        target_dir: &Path,
        store: CacheStore,
        compiler: &'a dyn Compiler,
        permissions: &'a dyn PermissionSetter,
        options: BuildOptions,
    ) -> Self {
        Self {
            target_dir: target_dir.to_path_buf(),
            store,
            compiler,
            permissions,
            options,
        }
    }

    /// The CSS path for `artifact`.
    pub fn output_path(&self, artifact: &ArtifactId) -> PathBuf {
        self.target_dir.join(artifact.output_file_name())
    }

    /// Processes every artifact in `sources` and reports the outcome of each.
    ///
    /// Failures are isolated per artifact; the rest of the batch continues.
    pub fn run(&self, sources: &[SourceDir]) -> BuildReport {
        let (jobs, shadowed) = collect_jobs(sources);
        let mut report: BuildReport = if self.options.parallel {
            jobs.par_iter()
                .map(|job| self.process(job))
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            jobs.iter().map(|job| self.process(job)).collect()
        };
        report.shadowed = shadowed;
        report
    }

    fn process(&self, job: &Job) -> Result<ArtifactOutcome, ArtifactFailure> {
        let artifact = &job.artifact;
        let record = self.store.load(artifact);
        let staleness = evaluate(record.as_ref(), &job.state);
        if !staleness.is_stale() {
            debug!(artifact = %artifact, status = "fresh", "cache hit");
            return Ok(ArtifactOutcome::Fresh(artifact.clone()));
        }
        info!(artifact = %artifact, reason = %staleness, "recompiling");

        let output = self
            .compiler
            .compile(artifact)
            .map_err(|e| ArtifactFailure::new(artifact, e))?;

        let record = CacheRecord::new(output.updated, output.compiled, &output.sources);
        let cache = self
            .store
            .save(artifact, &record)
            .map_err(|e| ArtifactFailure::new(artifact, e))?;

        let target = self.output_path(artifact);
        write_atomic(&target, record.compiled.as_bytes()).map_err(|source| {
            ArtifactFailure::new(
                artifact,
                FailureKind::OutputWrite {
                    path: target.clone(),
                    source,
                },
            )
        })?;

        if let Some(mode) = self.options.target_mode {
            self.permissions.set_mode(&target, mode).map_err(|source| {
                ArtifactFailure::new(
                    artifact,
                    FailureKind::Permissions {
                        path: target.clone(),
                        mode,
                        source,
                    },
                )
            })?;
        }

        debug!(artifact = %artifact, output = %target.display(), updated = %record.updated, "wrote output");
        Ok(ArtifactOutcome::Compiled(CompiledArtifact {
            artifact: artifact.clone(),
            output: target,
            cache,
        }))
    }
}
