//! lessup: incremental LESS to CSS compilation.
//!
//! `lessup build` recompiles the stylesheets whose sources changed since the
//! last run; `lessup status` shows what a build would do without doing it.

#![warn(missing_docs)]

mod build;
mod logging;
mod project;
mod status;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Exit code when the configuration is unusable and nothing was compiled.
const EXIT_CONFIG: i32 = 2;

/// Compile LESS stylesheets, skipping those that have not changed.
#[derive(Parser, Debug)]
#[command(name = "lessup", version, about = "Incremental LESS compiler")]
pub struct Cli {
    /// Only report warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `lessup.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every stale stylesheet.
    Build(BuildArgs),
    /// Show which stylesheets are stale.
    Status(StatusArgs),
}

/// Arguments for the `lessup build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Output style, overriding `less.formatter` (`classic` or `compressed`).
    #[arg(short, long)]
    pub formatter: Option<String>,

    /// Compile independent stylesheets in parallel.
    #[arg(short, long)]
    pub parallel: bool,
}

/// Arguments for the `lessup status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Status output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One line per stylesheet.
    Text,
    /// A JSON array.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress informational output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    logging::init(global.quiet, global.verbose);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!("{e}");
            process::exit(EXIT_CONFIG);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["lessup", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.formatter.is_none());
                assert!(!args.parallel);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from(["lessup", "build", "--formatter", "compressed", "--parallel"]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.formatter.as_deref(), Some("compressed"));
                assert!(args.parallel);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn unknown_formatter_is_left_to_config_validation() {
        let cli = Cli::parse_from(["lessup", "build", "-f", "minified"]);
        match cli.command {
            Command::Build(ref args) => assert_eq!(args.formatter.as_deref(), Some("minified")),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_status_json() {
        let cli = Cli::parse_from(["lessup", "status", "--format", "json"]);
        match cli.command {
            Command::Status(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["lessup", "--quiet", "--config", "site/lessup.toml", "status"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("site/lessup.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lessup", "build", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn build_with_bad_formatter_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["styles", "css", "cache"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        std::fs::write(
            dir.path().join("lessup.toml"),
            "[less]\nsource_dirs = \"styles\"\ntarget_dir = \"css\"\ncache_dir = \"cache\"\n",
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().display().to_string()),
        };
        let args = BuildArgs {
            formatter: Some("minified".into()),
            parallel: false,
        };
        assert!(matches!(
            build::run(&args, &global),
            Err(lessup_config::ConfigError::InvalidFormatter(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path().join("cache")).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn build_then_status_with_stand_in_compiler() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["styles", "css", "cache"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        std::fs::write(dir.path().join("styles/site.less"), "p { }").unwrap();
        std::fs::write(
            dir.path().join("lessup.toml"),
            "[less]\nsource_dirs = \"styles\"\ntarget_dir = \"css\"\ncache_dir = \"cache\"\n\n[compiler]\nprogram = \"cat\"\n",
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().display().to_string()),
        };
        let args = BuildArgs {
            formatter: None,
            parallel: true,
        };
        assert_eq!(build::run(&args, &global).unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("css/site.css")).unwrap(),
            "p { }"
        );
        let status_args = StatusArgs {
            format: ReportFormat::Text,
        };
        assert_eq!(status::run(&status_args, &global).unwrap(), 0);
    }
}
