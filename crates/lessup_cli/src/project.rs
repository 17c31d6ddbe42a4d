//! Locating the project and loading its configuration.

use std::path::{Path, PathBuf};

use lessup_config::{load_config_from_str, ConfigError, LessupConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `lessup.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "could not find {CONFIG_FILE} in {} or any parent directory",
                    start.display()
                ),
            )));
        }
    }
}

/// Resolves the configuration file to read from the global CLI args.
///
/// `--config` may name the file itself or the directory holding it. Without
/// it, the nearest `lessup.toml` above the working directory is used.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, ConfigError> {
    match global.config {
        Some(ref path) => {
            let path = PathBuf::from(path);
            if path.is_dir() {
                Ok(path.join(CONFIG_FILE))
            } else {
                Ok(path)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE)),
    }
}

/// Loads the configuration; relative paths in it resolve against the
/// directory containing the file.
pub fn load(global: &GlobalArgs) -> Result<(PathBuf, LessupConfig), ConfigError> {
    let config_path = resolve_config_path(global)?;
    let content = std::fs::read_to_string(&config_path)?;
    let config = load_config_from_str(&content)?;
    let project_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(config = %config_path.display(), "loaded configuration");
    Ok((project_dir, config))
}
