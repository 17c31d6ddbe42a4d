//! Per-run outcome reporting.

use std::io;
use std::path::PathBuf;

use lessup_cache::CacheError;
use lessup_common::ArtifactId;
use lessup_compiler::CompileError;

/// Why processing one artifact failed.
#[derive(Debug, thiserror::Error)]
pub enum FailureKind {
    /// The compiler rejected the source or could not run.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The cache record could not be written; the output was not written either.
    #[error("cache write failed, output left untouched: {0}")]
    CacheWrite(#[from] CacheError),

    /// The compiled CSS could not be written.
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The output was written but its permission mode could not be set.
    #[error("failed to set mode {mode:o} on {}: {source}", path.display())]
    Permissions {
        /// The output path.
        path: PathBuf,
        /// The requested mode.
        mode: u32,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// A failure isolated to one artifact.
#[derive(Debug, thiserror::Error)]
#[error("{artifact}: {kind}")]
pub struct ArtifactFailure {
    /// The artifact that failed.
    pub artifact: ArtifactId,
    /// What went wrong.
    pub kind: FailureKind,
}

impl ArtifactFailure {
    /// Creates a failure record.
    pub fn new(artifact: &ArtifactId, kind: impl Into<FailureKind>) -> Self {
        Self {
            artifact: artifact.clone(),
            kind: kind.into(),
        }
    }
}

/// A source directory that could not be listed.
#[derive(Debug, thiserror::Error)]
#[error("failed to scan {}: {source}", dir.display())]
pub struct ScanFailure {
    /// The directory.
    pub dir: PathBuf,
    /// The underlying I/O error.
    pub source: io::Error,
}

/// An artifact that was recompiled during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// The artifact.
    pub artifact: ArtifactId,
    /// Written CSS file.
    pub output: PathBuf,
    /// Written cache record.
    pub cache: PathBuf,
}

/// Result of processing one artifact successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The cache record was current; nothing was written.
    Fresh(ArtifactId),
    /// The artifact was recompiled and both files were written.
    Compiled(CompiledArtifact),
}

/// Aggregated outcome of a build run, in candidate order.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Artifacts that were recompiled.
    pub compiled: Vec<CompiledArtifact>,
    /// Artifacts whose cache was current.
    pub fresh: Vec<ArtifactId>,
    /// Per-artifact failures.
    pub failures: Vec<ArtifactFailure>,
    /// Source directories that could not be scanned.
    pub scan_failures: Vec<ScanFailure>,
    /// Sources skipped because an earlier directory owns their output name.
    pub shadowed: Vec<ArtifactId>,
}

impl BuildReport {
    /// Adds the result of processing one artifact.
    pub fn push(&mut self, result: Result<ArtifactOutcome, ArtifactFailure>) {
        match result {
            Ok(ArtifactOutcome::Fresh(artifact)) => self.fresh.push(artifact),
            Ok(ArtifactOutcome::Compiled(compiled)) => self.compiled.push(compiled),
            Err(failure) => self.failures.push(failure),
        }
    }

    /// `true` if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.scan_failures.is_empty()
    }

    /// Number of artifacts considered.
    pub fn total(&self) -> usize {
        self.compiled.len() + self.fresh.len() + self.failures.len()
    }
}

impl FromIterator<Result<ArtifactOutcome, ArtifactFailure>> for BuildReport {
    fn from_iter<I: IntoIterator<Item = Result<ArtifactOutcome, ArtifactFailure>>>(iter: I) -> Self {
        let mut report = BuildReport::default();
        iter.into_iter().for_each(|r| report.push(r));
        report
    }
}
