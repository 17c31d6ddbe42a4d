//! `lessup build`: compile every stale stylesheet.

use lessup_compiler::LesscCompiler;
use lessup_config::{resolve_settings, ConfigError, Overrides};
use lessup_pipeline::{build, BuildReport, FsScanner, UnixPermissions};

use crate::{project, BuildArgs, GlobalArgs};

/// Runs the build, returning the process exit code.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, ConfigError> {
    let (project_dir, config) = project::load(global)?;
    let overrides = Overrides {
        formatter: args.formatter.clone(),
        parallel: args.parallel.then_some(true),
    };
    let settings = resolve_settings(&config, &project_dir, &overrides)?;

    let compiler = LesscCompiler::new(
        settings.compiler.program.clone(),
        settings.compiler.args.clone(),
        settings.formatter,
    );
    tracing::debug!(
        formatter = %settings.formatter,
        parallel = settings.parallel,
        dirs = settings.source_dirs.len(),
        "starting build"
    );

    let report = build(&settings, &FsScanner, &compiler, &UnixPermissions);
    log_report(&report);
    Ok(if report.is_success() { 0 } else { 1 })
}

fn log_report(report: &BuildReport) {
    for compiled in &report.compiled {
        tracing::info!(output = %compiled.output.display(), "compiled {}", compiled.artifact);
    }
    for artifact in &report.fresh {
        tracing::debug!("{artifact} is up to date");
    }
    for artifact in &report.shadowed {
        tracing::warn!("{artifact} skipped, an earlier source directory provides the same name");
    }
    for failure in &report.scan_failures {
        tracing::error!("{failure}");
    }
    for failure in &report.failures {
        tracing::error!("{failure}");
    }
    tracing::info!(
        compiled = report.compiled.len(),
        fresh = report.fresh.len(),
        failed = report.failures.len() + report.scan_failures.len(),
        "build finished"
    );
}
