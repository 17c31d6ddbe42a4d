//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::LessupConfig;
use std::path::Path;

/// Name of the configuration file in a project root.
pub const CONFIG_FILE: &str = "lessup.toml";

/// Loads and validates the `lessup.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<LessupConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `lessup.toml` configuration from a string.
///
/// Only checks that required fields are present; filesystem checks happen
/// in [`resolve_settings`](crate::resolve_settings).
pub fn load_config_from_str(content: &str) -> Result<LessupConfig, ConfigError> {
    let config: LessupConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and non-empty.
fn validate_config(config: &LessupConfig) -> Result<(), ConfigError> {
    let less = &config.less;
    if less.source_dirs.is_empty() || less.source_dirs.iter().any(|d| d.is_empty()) {
        return Err(ConfigError::MissingField("less.source_dirs".to_string()));
    }
    if less.target_dir.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingField("less.target_dir".to_string()));
    }
    if less.cache_dir.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingField("less.cache_dir".to_string()));
    }
    if config.compiler.program.is_empty() {
        return Err(ConfigError::MissingField("compiler.program".to_string()));
    }
    Ok(())
}
