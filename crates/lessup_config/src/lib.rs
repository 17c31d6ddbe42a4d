//! Parsing and validation of `lessup.toml` project configuration files.
//!
//! Loading produces a raw [`LessupConfig`]; [`resolve_settings`] checks it
//! against the filesystem and yields the [`BuildSettings`] that drive a run.
//! Every configuration problem is reported before any file is compiled.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use settings::{resolve_settings, BuildSettings, CompilerSettings, Overrides};
pub use types::*;
