//! # mipha-engine
//!
//! Renders every template once per context into `<output>/<context>/...`.
//!
//! Call [`pipeline::run`] for a complete run, or drive the two phases
//! yourself with [`Engine::load`] and [`Engine::execute`].

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use engine::{Engine, RenderJob, RenderReport};
pub use error::EngineError;
pub use writer::WriteResult;
