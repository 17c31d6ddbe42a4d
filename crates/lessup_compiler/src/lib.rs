//! The LESS-to-CSS compilation boundary.
//!
//! The cache treats compilation as a black box behind the [`Compiler`] trait.
//! [`LesscCompiler`] is the default implementation and shells out to a
//! `lessc`-compatible program.

#![warn(missing_docs)]

pub mod error;
pub mod lessc;

use std::path::PathBuf;

use lessup_common::{ArtifactId, Timestamp};

pub use error::CompileError;
pub use lessc::LesscCompiler;

/// Result of compiling one source artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// The compiled CSS.
    pub compiled: String,
    /// When compilation started; stored as the cache record's provenance.
    pub updated: Timestamp,
    /// Source files that contributed to the output.
    pub sources: Vec<PathBuf>,
}

/// Turns a LESS source artifact into CSS.
///
/// Implementations are configured with a formatter mode at construction and
/// must be deterministic for identical input. A failure applies to that one
/// artifact only.
pub trait Compiler: Send + Sync {
    /// Compiles `artifact`.
    fn compile(&self, artifact: &ArtifactId) -> Result<CompileOutput, CompileError>;
}
