//! Per-file writer.
//!
//! ## `write_rendered` protocol
//!
//! 1. Create `<path>.mipha.tmp` and wrap it in a buffered writer.
//! 2. Stream the rendered template into it.
//! 3. On render failure, delete the temporary file and return the error.
//! 4. Flush and close the handle.
//! 5. Rename to the final path (atomic on POSIX).
//!
//! The handle is released before the function returns, whatever the outcome.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mipha_renderer::RenderError;

use crate::error::{io_err, EngineError};

/// Suffix of the temporary file a template is rendered into.
pub const TMP_SUFFIX: &str = ".mipha.tmp";

/// Outcome of an individual (context, template) job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was rendered and written.
    Written { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::WouldWrite { path } => path,
        }
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Render into a temporary sibling of `path`, then move it into place.
///
/// `render` receives the open writer; its error is returned unchanged
/// (wrapped in [`EngineError::Render`]) after the temporary file is removed.
pub(crate) fn write_rendered<F>(path: &Path, render: F) -> Result<WriteResult, EngineError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), RenderError>,
{
    let tmp = tmp_path(path);
    write_rendered_with_tmp(path, &tmp, render)
}

fn write_rendered_with_tmp<F>(path: &Path, tmp: &Path, render: F) -> Result<WriteResult, EngineError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), RenderError>,
{
    let file = File::create(tmp).map_err(|e| io_err(tmp, e))?;
    let mut out = BufWriter::new(file);

    if let Err(e) = render(&mut out) {
        drop(out);
        let _ = std::fs::remove_file(tmp);
        return Err(e.into());
    }

    match out.into_inner() {
        Ok(file) => drop(file),
        Err(e) => {
            let source = e.into_error();
            let _ = std::fs::remove_file(tmp);
            return Err(io_err(tmp, source));
        }
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
