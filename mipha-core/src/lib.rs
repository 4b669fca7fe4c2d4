//! Mipha core library — run configuration, context sets, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, [`RunConfig`], [`ContextSet`]
//! - [`error`] — [`ContextError`]
//! - [`contexts`] — configuration document loading

pub mod contexts;
pub mod error;
pub mod types;

pub use error::ContextError;
pub use types::{ContextName, ContextSet, RunConfig};
