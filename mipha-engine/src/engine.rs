//! Render Engine — the (context × template) render loop.
//!
//! ## Output layout
//!
//! ```text
//! <output>/
//!   <context_name>/
//!     <relative_dir>/<file_name>   (one per template unit)
//! ```
//!
//! `execute` wipes `<output>` first, so every run fully replaces the tree.
//! Contexts are processed in name order; the first error aborts the run and
//! whatever was written before it stays on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mipha_core::{contexts, ContextName, ContextSet, RunConfig};
use mipha_renderer::{to_tera_context, TemplateCollection};

use crate::error::{io_err, EngineError};
use crate::writer::{self, WriteResult};

// ---------------------------------------------------------------------------
// Plan / report types
// ---------------------------------------------------------------------------

/// One (context, template) pair and the file it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub context: ContextName,
    /// Template path relative to the template root.
    pub template: PathBuf,
    pub destination: PathBuf,
}

/// Summary of an `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub contexts: usize,
    pub templates: usize,
    pub dry_run: bool,
    pub writes: Vec<WriteResult>,
}

impl RenderReport {
    pub fn written(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Written { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Loaded templates and contexts, bound to an output root.
///
/// Built once per run by [`Engine::load`]; read-only afterwards.
#[derive(Debug)]
pub struct Engine {
    templates: TemplateCollection,
    contexts: ContextSet,
    output: PathBuf,
    dry_run: bool,
}

impl Engine {
    pub fn new(templates: TemplateCollection, contexts: ContextSet, output: impl Into<PathBuf>) -> Self {
        Engine {
            templates,
            contexts,
            output: output.into(),
            dry_run: false,
        }
    }

    /// Load phase: helper file, template tree, then the context set.
    ///
    /// Nothing under the output root is touched.
    pub fn load(config: &RunConfig) -> Result<Self, EngineError> {
        let templates = TemplateCollection::load_with_helper(&config.templates, config.helper_path())?;
        tracing::info!(
            "loaded {} template(s) and {} helper(s) from {}",
            templates.len(),
            templates.helpers().len(),
            config.templates.display()
        );

        let contexts = contexts::load_at(&config.config)?;
        tracing::info!(
            "loaded {} context(s) from {}",
            contexts.len(),
            config.config.display()
        );

        Ok(Engine::new(templates, contexts, &config.output).with_dry_run(config.dry_run))
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn templates(&self) -> &TemplateCollection {
        &self.templates
    }

    pub fn contexts(&self) -> &ContextSet {
        &self.contexts
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Every job `execute` will run, in execution order.
    pub fn plan(&self) -> Vec<RenderJob> {
        self.contexts
            .names()
            .flat_map(|name| {
                self.templates.iter().map(move |unit| RenderJob {
                    context: name.clone(),
                    template: unit.relative_path(),
                    destination: self.output.join(name).join(unit.relative_path()),
                })
            })
            .collect()
    }

    /// Execute phase: wipe the output root and render every job.
    ///
    /// In dry-run mode the output root is left alone and every job is
    /// rendered into a sink, so evaluation errors still surface.
    pub fn execute(&self) -> Result<RenderReport, EngineError> {
        if !self.dry_run {
            remove_output(&self.output)?;
        }

        let mut writes = Vec::with_capacity(self.contexts.len() * self.templates.len());
        for (name, vars) in self.contexts.iter() {
            tracing::info!("rendering context '{}'", name);
            let ctx = to_tera_context(vars)?;
            let context_dir = self.output.join(name);

            if self.dry_run {
                for unit in self.templates.iter() {
                    unit.render_to(&ctx, std::io::sink())?;
                    let path = context_dir.join(unit.relative_path());
                    tracing::info!("[dry-run] would write: {}", path.display());
                    writes.push(WriteResult::WouldWrite { path });
                }
                continue;
            }

            std::fs::create_dir_all(&context_dir).map_err(|e| io_err(&context_dir, e))?;
            for unit in self.templates.iter() {
                let dir = context_dir.join(unit.relative_dir());
                std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
                let path = dir.join(unit.file_name());
                let result = writer::write_rendered(&path, |out| unit.render_to(&ctx, out))?;
                writes.push(result);
            }
        }

        Ok(RenderReport {
            output: self.output.clone(),
            contexts: self.contexts.len(),
            templates: self.templates.len(),
            dry_run: self.dry_run,
            writes,
        })
    }
}

/// Remove the output root, whatever it is. A missing root is not an error.
fn remove_output(path: &Path) -> Result<(), EngineError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(io_err(path, e)),
    };
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|e| io_err(path, e))?;
    tracing::debug!("removed previous output: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
