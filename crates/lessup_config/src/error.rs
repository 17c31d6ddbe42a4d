//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `lessup.toml` configuration.
///
/// All of these are fatal: they are raised before any source is compiled.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The formatter is not one of the supported modes.
    #[error("invalid less.formatter: {0}")]
    InvalidFormatter(#[from] lessup_common::ParseFormatterError),

    /// The output permission mode is not a valid octal mode.
    #[error("invalid less.target_mode '{0}', expected an octal mode such as \"0644\"")]
    InvalidMode(String),

    /// A configured directory does not exist.
    #[error("{role} directory \"{}\" does not exist", path.display())]
    MissingDirectory {
        /// Which setting named the directory.
        role: &'static str,
        /// The resolved path.
        path: PathBuf,
    },

    /// A configured directory cannot be written to.
    #[error("{role} directory \"{}\" is not writable: {source}", path.display())]
    NotWritable {
        /// Which setting named the directory.
        role: &'static str,
        /// The resolved path.
        path: PathBuf,
        /// The error raised by the write probe.
        source: std::io::Error,
    },
}
