//! Output formatter modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The style of CSS the compiler emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formatter {
    /// Readable, indented output (default).
    #[default]
    Classic,
    /// Minified output.
    Compressed,
}

impl Formatter {
    /// Every supported mode, in the order they are listed in error messages.
    pub const ALL: [Formatter; 2] = [Formatter::Classic, Formatter::Compressed];

    /// The configuration spelling of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Formatter::Classic => "classic",
            Formatter::Compressed => "compressed",
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a formatter name is not one of the supported modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown formatter '{0}', expected 'classic' or 'compressed'")]
pub struct ParseFormatterError(pub String);

impl FromStr for Formatter {
    type Err = ParseFormatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formatter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseFormatterError(s.to_string()))
    }
}
