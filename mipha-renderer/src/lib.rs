//! # mipha-renderer
//!
//! Loads a template tree into compiled [`TemplateUnit`]s, with shared helper
//! macros and an extended filter library, and executes them against context
//! variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mipha_renderer::{to_tera_context, TemplateCollection};
//!
//! fn render_all(vars: &serde_yaml::Value) -> Result<(), mipha_renderer::RenderError> {
//!     let templates = TemplateCollection::load_with_helper(
//!         Path::new("templates"),
//!         Some(Path::new("helper.tpl")),
//!     )?;
//!     let ctx = to_tera_context(vars)?;
//!     for unit in templates.iter() {
//!         let out = unit.render(&ctx)?;
//!         println!("{}: {} bytes", unit.relative_path().display(), out.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
mod filters;
pub mod helpers;
pub mod template;

pub use context::to_tera_context;
pub use error::RenderError;
pub use helpers::{HelperDefinition, HelperLibrary};
pub use template::{TemplateCollection, TemplateUnit};
