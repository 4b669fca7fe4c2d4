//! Conversion from a context's YAML variable tree to a [`tera::Context`].

use crate::error::RenderError;

/// Variable name a non-mapping context value is exposed under.
pub const VALUE_KEY: &str = "value";

/// Build the evaluation scope for one context.
///
/// A mapping becomes the scope directly, so `Name: World` is `{{ Name }}`.
/// Any other value (scalar, sequence, null) is bound to [`VALUE_KEY`].
pub fn to_tera_context(vars: &serde_yaml::Value) -> Result<tera::Context, RenderError> {
    if vars.is_mapping() {
        return tera::Context::from_serialize(vars).map_err(RenderError::Context);
    }
    let mut ctx = tera::Context::new();
    ctx.insert(VALUE_KEY, vars);
    Ok(ctx)
}
