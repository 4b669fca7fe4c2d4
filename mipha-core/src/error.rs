//! Error types for mipha-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a context set.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The configuration document could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but has no (or an empty) `configurations` section.
    #[error("invalid configuration file {path}, no 'configurations' section")]
    MissingSection { path: PathBuf },

    /// A context name cannot be used as an output directory name.
    #[error("invalid context name '{name}' in {path}: must be a single, non-empty directory name")]
    InvalidContextName { path: PathBuf, name: String },

    /// A context key is not a scalar (string, number or boolean).
    #[error("invalid context key in {path}: expected a string, number or boolean, found {kind}")]
    UnsupportedContextKey { path: PathBuf, kind: &'static str },

    /// Two keys map to the same context name once converted to text, e.g. `1` and `"1"`.
    #[error("duplicate context name '{name}' in {path}")]
    DuplicateContextName { path: PathBuf, name: String },
}
