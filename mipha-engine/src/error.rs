//! Error types for mipha-engine.

use std::path::PathBuf;

use thiserror::Error;

use mipha_core::ContextError;
use mipha_renderer::RenderError;

/// All errors that can arise from loading or executing a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Template, helper or evaluation error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration document error.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// An I/O error on the output tree, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
