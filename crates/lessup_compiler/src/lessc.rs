//! Compilation through an external `lessc`-compatible program.

use std::process::Command;

use lessup_common::{ArtifactId, Formatter, Timestamp};
use tracing::debug;

use crate::error::CompileError;
use crate::{CompileOutput, Compiler};

/// Flag passed to the compiler in [`Formatter::Compressed`] mode.
const COMPRESS_FLAG: &str = "--compress";

/// Runs `<program> [args..] [--compress] <source>` and captures stdout as CSS.
#[derive(Debug, Clone)]
pub struct LesscCompiler {
    program: String,
    args: Vec<String>,
    formatter: Formatter,
}

impl LesscCompiler {
    /// Creates a compiler invoking `program` with extra `args` in `formatter` mode.
    pub fn new(program: impl Into<String>, args: Vec<String>, formatter: Formatter) -> Self {
        Self {
            program: program.into(),
            args,
            formatter,
        }
    }

    /// The configured formatter mode.
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    fn command(&self, artifact: &ArtifactId) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.formatter == Formatter::Compressed {
            cmd.arg(COMPRESS_FLAG);
        }
        cmd.arg(artifact.source_path());
        cmd
    }
}

impl Compiler for LesscCompiler {
    fn compile(&self, artifact: &ArtifactId) -> Result<CompileOutput, CompileError> {
        let path = artifact.source_path();
        let started = Timestamp::now();
        debug!(artifact = %artifact, program = %self.program, formatter = %self.formatter, "invoking compiler");

        let output = self
            .command(artifact)
            .output()
            .map_err(|e| CompileError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                path,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let compiled = String::from_utf8(output.stdout).map_err(|e| CompileError::InvalidOutput {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(CompileOutput {
            compiled,
            updated: started,
            sources: vec![path],
        })
    }
}
