//! Resolution of a parsed configuration into validated build settings.

use std::path::{Path, PathBuf};

use lessup_common::Formatter;

use crate::error::ConfigError;
use crate::types::{LessupConfig, ModeSpec};

/// Highest permission mode accepted for `less.target_mode`.
const MAX_MODE: u32 = 0o7777;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Formatter name; validated like the configured one.
    pub formatter: Option<String>,
    /// Whether to compile on a thread pool.
    pub parallel: Option<bool>,
}

/// How to invoke the external compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Program name or resolved path.
    pub program: String,
    /// Extra arguments.
    pub args: Vec<String>,
}

/// Fully validated settings for one build run.
///
/// Directory paths are resolved against the project directory. Source
/// directories exist; target and cache directories exist and are writable.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Directories scanned for `.less` files, in configuration order.
    pub source_dirs: Vec<PathBuf>,
    /// Directory receiving compiled CSS.
    pub target_dir: PathBuf,
    /// Directory receiving cache records.
    pub cache_dir: PathBuf,
    /// Output style.
    pub formatter: Formatter,
    /// Permission mode applied to written CSS files.
    pub target_mode: Option<u32>,
    /// Compiler invocation.
    pub compiler: CompilerSettings,
    /// Compile on a thread pool.
    pub parallel: bool,
}

/// Validates `config` against the filesystem and produces [`BuildSettings`].
///
/// Checks run in order: formatter, permission mode, source directories,
/// target directory, cache directory. Nothing is written except a transient
/// probe file used to test writability.
pub fn resolve_settings(
    config: &LessupConfig,
    project_dir: &Path,
    overrides: &Overrides,
) -> Result<BuildSettings, ConfigError> {
    let less = &config.less;

    let formatter = match overrides.formatter.as_deref().or(less.formatter.as_deref()) {
        Some(name) => name.parse::<Formatter>()?,
        None => Formatter::default(),
    };

    let target_mode = less.target_mode.as_ref().map(parse_mode).transpose()?;

    let mut source_dirs = Vec::with_capacity(less.source_dirs.len());
    for dir in &less.source_dirs {
        let path = project_dir.join(dir);
        if !path.is_dir() {
            return Err(ConfigError::MissingDirectory {
                role: "source",
                path,
            });
        }
        source_dirs.push(path);
    }

    let target_dir = writable_dir("target", project_dir, less.target_dir.as_deref())?;
    let cache_dir = writable_dir("cache", project_dir, less.cache_dir.as_deref())?;

    Ok(BuildSettings {
        source_dirs,
        target_dir,
        cache_dir,
        formatter,
        target_mode,
        compiler: CompilerSettings {
            program: resolve_program(project_dir, &config.compiler.program),
            args: config.compiler.args.clone(),
        },
        parallel: overrides.parallel.unwrap_or(config.build.parallel),
    })
}

/// Converts a configured mode into permission bits.
pub fn parse_mode(spec: &ModeSpec) -> Result<u32, ConfigError> {
    let mode = match spec {
        ModeSpec::Numeric(n) => Some(*n),
        ModeSpec::Octal(text) => {
            let digits = text.trim();
            let digits = digits.strip_prefix("0o").unwrap_or(digits);
            u32::from_str_radix(digits, 8).ok()
        }
    };
    let invalid = || {
        let shown = match spec {
            ModeSpec::Numeric(n) => n.to_string(),
            ModeSpec::Octal(s) => s.clone(),
        };
        ConfigError::InvalidMode(shown)
    };
    mode.filter(|m| *m <= MAX_MODE).ok_or_else(invalid)
}

fn writable_dir(
    role: &'static str,
    project_dir: &Path,
    dir: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let dir = dir.ok_or_else(|| ConfigError::MissingField(format!("less.{role}_dir")))?;
    let path = project_dir.join(dir);
    if !path.is_dir() {
        return Err(ConfigError::MissingDirectory { role, path });
    }
    tempfile::tempfile_in(&path).map_err(|source| ConfigError::NotWritable {
        role,
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Program names with a directory component are relative to the project.
fn resolve_program(project_dir: &Path, program: &str) -> String {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        project_dir.join(path).to_string_lossy().into_owned()
    } else {
        program.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    struct Project {
        dir: tempfile::TempDir,
    }

    impl Project {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            for sub in ["styles", "public", "cache"] {
                std::fs::create_dir(dir.path().join(sub)).unwrap();
            }
            Self { dir }
        }

        fn resolve(&self, extra: &str) -> Result<BuildSettings, ConfigError> {
            self.resolve_with(extra, &Overrides::default())
        }

        fn resolve_with(
            &self,
            extra: &str,
            overrides: &Overrides,
        ) -> Result<BuildSettings, ConfigError> {
            let toml = format!(
                "[less]\nsource_dirs = \"styles\"\ntarget_dir = \"public\"\ncache_dir = \"cache\"\n{extra}"
            );
            let config = load_config_from_str(&toml)?;
            resolve_settings(&config, self.dir.path(), overrides)
        }
    }

    #[test]
    fn resolves_paths_against_project() {
        let project = Project::new();
        let settings = project.resolve("").unwrap();
        assert_eq!(settings.source_dirs, vec![project.dir.path().join("styles")]);
        assert_eq!(settings.target_dir, project.dir.path().join("public"));
        assert_eq!(settings.cache_dir, project.dir.path().join("cache"));
        assert_eq!(settings.formatter, Formatter::Classic);
        assert_eq!(settings.target_mode, None);
        assert!(!settings.parallel);
    }

    #[test]
    fn compressed_formatter() {
        let project = Project::new();
        let settings = project.resolve("formatter = \"compressed\"\n").unwrap();
        assert_eq!(settings.formatter, Formatter::Compressed);
    }

    #[test]
    fn unknown_formatter_rejected_without_writes() {
        let project = Project::new();
        let err = project.resolve("formatter = \"nested\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormatter(_)));
        for sub in ["public", "cache"] {
            let entries = std::fs::read_dir(project.dir.path().join(sub)).unwrap().count();
            assert_eq!(entries, 0);
        }
    }

    #[test]
    fn formatter_override_wins() {
        let project = Project::new();
        let overrides = Overrides {
            formatter: Some("compressed".to_string()),
            parallel: Some(true),
        };
        let settings = project
            .resolve_with("formatter = \"classic\"\n", &overrides)
            .unwrap();
        assert_eq!(settings.formatter, Formatter::Compressed);
        assert!(settings.parallel);
    }

    #[test]
    fn invalid_formatter_override_rejected() {
        let project = Project::new();
        let overrides = Overrides {
            formatter: Some("tiny".to_string()),
            parallel: None,
        };
        assert!(matches!(
            project.resolve_with("", &overrides).unwrap_err(),
            ConfigError::InvalidFormatter(_)
        ));
    }

    #[test]
    fn target_mode_octal_string() {
        let project = Project::new();
        let settings = project.resolve("target_mode = \"0644\"\n").unwrap();
        assert_eq!(settings.target_mode, Some(0o644));
    }

    #[test]
    fn target_mode_rejects_non_octal() {
        let project = Project::new();
        let err = project.resolve("target_mode = \"0698\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode(ref m) if m == "0698"));
    }

    #[test]
    fn parse_mode_variants() {
        assert_eq!(parse_mode(&ModeSpec::Numeric(420)).unwrap(), 0o644);
        assert_eq!(parse_mode(&ModeSpec::Octal("0o755".into())).unwrap(), 0o755);
        assert_eq!(parse_mode(&ModeSpec::Octal("600".into())).unwrap(), 0o600);
        assert!(parse_mode(&ModeSpec::Numeric(0o17777)).is_err());
    }

    #[test]
    fn missing_source_dir_errors() {
        let project = Project::new();
        std::fs::remove_dir(project.dir.path().join("styles")).unwrap();
        let err = project.resolve("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { role: "source", .. }));
    }

    #[test]
    fn missing_cache_dir_errors() {
        let project = Project::new();
        std::fs::remove_dir(project.dir.path().join("cache")).unwrap();
        let err = project.resolve("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { role: "cache", .. }));
    }

    #[test]
    fn target_dir_must_be_directory() {
        let project = Project::new();
        std::fs::remove_dir(project.dir.path().join("public")).unwrap();
        std::fs::write(project.dir.path().join("public"), "").unwrap();
        let err = project.resolve("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { role: "target", .. }));
    }

    #[test]
    fn program_with_directory_is_project_relative() {
        let project = Project::new();
        let settings = project
            .resolve("[compiler]\nprogram = \"node_modules/.bin/lessc\"\n")
            .unwrap();
        assert_eq!(
            settings.compiler.program,
            project
                .dir
                .path()
                .join("node_modules/.bin/lessc")
                .to_string_lossy()
        );
    }

    #[test]
    fn bare_program_is_left_for_path_lookup() {
        let project = Project::new();
        let settings = project.resolve("").unwrap();
        assert_eq!(settings.compiler.program, "lessc");
    }
}
