//! Single entry point used by the CLI: load, then execute.

use mipha_core::RunConfig;

use crate::engine::{Engine, RenderReport};
use crate::error::EngineError;

/// Run a full render for `config`.
///
/// Any load error is returned before the output root is touched.
pub fn run(config: &RunConfig) -> Result<RenderReport, EngineError> {
    let engine = Engine::load(config)?;
    engine.execute()
}
