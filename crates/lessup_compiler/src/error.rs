//! Compilation errors.

use std::path::PathBuf;

/// Errors raised while compiling a single artifact.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler rejected the source.
    #[error("{}", failed_message(.path, .status, .stderr))]
    Failed {
        /// The source file being compiled.
        path: PathBuf,
        /// Process exit code, if the process exited normally.
        status: Option<i32>,
        /// Diagnostic output captured from the compiler.
        stderr: String,
    },

    /// The compiler produced output that is not valid CSS text.
    #[error("invalid compiler output for {path}: {reason}")]
    InvalidOutput {
        /// The source file being compiled.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },
}

fn failed_message(path: &std::path::Path, status: &Option<i32>, stderr: &str) -> String {
    let status = match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        format!("compiling {} failed ({status})", path.display())
    } else {
        format!("compiling {} failed ({status}): {stderr}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_display_with_stderr() {
        let err = CompileError::Failed {
            path: PathBuf::from("styles/a.less"),
            status: Some(1),
            stderr: "ParseError: Unrecognised input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "compiling styles/a.less failed (exit code 1): ParseError: Unrecognised input"
        );
    }

    #[test]
    fn failed_display_signal() {
        let err = CompileError::Failed {
            path: PathBuf::from("a.less"),
            status: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "compiling a.less failed (terminated by signal)");
    }

    #[test]
    fn spawn_display() {
        let err = CompileError::Spawn {
            program: "lessc".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("failed to run 'lessc'"));
    }
}
