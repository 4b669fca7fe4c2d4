//! Error types for mipha-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or rendering templates.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Filesystem error while walking or reading templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The helper file is not a valid template document.
    #[error("failed to parse helper file {path}: {source}")]
    Helper {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// A template file failed to compile or to merge the helper definitions.
    #[error("failed to compile template {path}: {source}")]
    Compile {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// A template calls a macro through a namespace it never imported.
    #[error("template {path} calls `{namespace}::{name}` but namespace `{namespace}` is not available")]
    UnknownNamespace {
        path: PathBuf,
        namespace: String,
        name: String,
    },

    /// A macro call is used as an arithmetic operand, which Tera cannot evaluate.
    #[error("template {path} uses `{namespace}::{name}` in a math expression; convert it with a filter such as `int` first")]
    MacroInMath {
        path: PathBuf,
        namespace: String,
        name: String,
    },

    /// A template calls a helper macro the helper file does not define.
    #[error("template {path} calls helper `{name}` which is not defined in the helper file")]
    UnknownHelper { path: PathBuf, name: String },

    /// Template evaluation failed (undefined variable, bad filter input, ...).
    #[error("failed to render template {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// A context's variables could not be turned into a template context.
    #[error("context serialization error: {0}")]
    Context(#[source] tera::Error),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
