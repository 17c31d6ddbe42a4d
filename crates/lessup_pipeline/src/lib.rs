//! The incremental LESS build pipeline.
//!
//! Ties scanning, cache lookup, staleness evaluation, compilation and output
//! writing together. [`build`] runs a whole configuration; [`Orchestrator`]
//! is the per-artifact loop underneath it, usable with any [`Compiler`],
//! [`SourceScanner`] and [`PermissionSetter`].

#![warn(missing_docs)]

pub mod orchestrator;
pub mod permissions;
pub mod report;
pub mod scanner;

use lessup_cache::{CacheStore, Staleness};
use lessup_common::ArtifactId;
use lessup_compiler::Compiler;
use lessup_config::BuildSettings;

pub use orchestrator::{plan, scan_sources, BuildOptions, Orchestrator, SourceDir};
pub use permissions::{PermissionSetter, UnixPermissions};
pub use report::{
    ArtifactFailure, ArtifactOutcome, BuildReport, CompiledArtifact, FailureKind, ScanFailure,
};
pub use scanner::{FsScanner, MemoryScanner, SourceScanner};

/// Version stamped into cache records; records from other versions are misses.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scans the configured source directories and rebuilds every stale artifact.
pub fn build(
    settings: &BuildSettings,
    scanner: &dyn SourceScanner,
    compiler: &dyn Compiler,
    permissions: &dyn PermissionSetter,
) -> BuildReport {
    let (sources, scan_failures) = scan_sources(scanner, &settings.source_dirs);
    let orchestrator = Orchestrator::new(
        &settings.target_dir,
        CacheStore::new(&settings.cache_dir, TOOL_VERSION),
        compiler,
        permissions,
        BuildOptions {
            target_mode: settings.target_mode,
            parallel: settings.parallel,
        },
    );
    let mut report = orchestrator.run(&sources);
    report.scan_failures = scan_failures;
    report
}

/// Reports the staleness of every artifact without writing anything.
pub fn status(
    settings: &BuildSettings,
    scanner: &dyn SourceScanner,
) -> (Vec<(ArtifactId, Staleness)>, Vec<ScanFailure>) {
    let (sources, scan_failures) = scan_sources(scanner, &settings.source_dirs);
    let store = CacheStore::new(&settings.cache_dir, TOOL_VERSION);
    (plan(&store, &sources), scan_failures)
}
