//! Configuration types deserialized from `lessup.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `lessup.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct LessupConfig {
    /// Source, output and cache locations plus output style.
    #[serde(default)]
    pub less: LessConfig,
    /// External compiler invocation.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Run-level options.
    #[serde(default)]
    pub build: BuildOptionsConfig,
}

/// The `[less]` table.
///
/// Directory fields are optional at the type level so that a missing one is
/// reported as [`ConfigError::MissingField`](crate::ConfigError::MissingField)
/// rather than a TOML parse error.
#[derive(Debug, Default, Deserialize)]
pub struct LessConfig {
    /// Directories scanned for `.less` files. Accepts a string or a list.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub source_dirs: Vec<String>,
    /// Directory receiving compiled `.css` files.
    pub target_dir: Option<String>,
    /// Directory receiving `.css.cache` records.
    pub cache_dir: Option<String>,
    /// Output style, `classic` or `compressed`. Checked during resolution.
    pub formatter: Option<String>,
    /// Permission mode applied to written CSS files.
    pub target_mode: Option<ModeSpec>,
}

/// A permission mode as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModeSpec {
    /// A numeric mode, e.g. `420` or `0o644`.
    Numeric(u32),
    /// An octal string, e.g. `"0644"` or `"755"`.
    Octal(String),
}

/// The `[compiler]` table.
#[derive(Debug, Deserialize)]
pub struct CompilerConfig {
    /// Program invoked to compile one file.
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments placed before the source path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    "lessc".to_string()
}

/// The `[build]` table.
#[derive(Debug, Default, Deserialize)]
pub struct BuildOptionsConfig {
    /// Compile stale artifacts on a thread pool.
    #[serde(default)]
    pub parallel: bool,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `source_dirs = "styles"` as shorthand for `source_dirs = ["styles"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
