//! Tracing subscriber setup for the `lessup` binary.
//!
//! `RUST_LOG` takes precedence over the level implied by `--quiet` and
//! `--verbose`. Set `LESSUP_LOG_FORMAT=compact` (or run under `CI`) to drop
//! colours from the output.

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Coloured, for interactive terminals.
    Pretty,
    /// Plain text, for CI and log files.
    Compact,
}

impl LogFormat {
    /// Reads `LESSUP_LOG_FORMAT`, falling back on the presence of `CI`.
    pub fn from_env() -> Self {
        match std::env::var("LESSUP_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ if std::env::var("CI").is_ok() => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Default filter directive for the given verbosity flags.
pub fn default_level(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Installs the global subscriber. Logs go to stderr so that `status --format
/// json` keeps stdout machine-readable.
pub fn init(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(quiet, verbose)));

    let ansi = LogFormat::from_env() == LogFormat::Pretty;
    // A second init (as in tests) is harmless; ignore the error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(io::stderr),
        )
        .try_init();
}
