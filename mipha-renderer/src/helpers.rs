//! Helper Loader — shared macros available to every template unit.
//!
//! The helper file is an ordinary Tera document made of `{% macro %}`
//! definitions:
//!
//! ```text
//! {% macro greet(name) %}Hello, {{ name }}!{% endmacro greet %}
//! ```
//!
//! Templates call them through the `helpers` namespace, which the template
//! loader imports into every unit: `{{ helpers::greet(name=Name) }}`.

use std::path::{Path, PathBuf};

use tera::Tera;

use crate::error::{io_err, RenderError};
use crate::filters;

/// Name the helper document is registered under. Never rendered itself.
pub const HELPER_TEMPLATE_NAME: &str = "__mipha_helpers__";

/// Namespace helper macros are reachable through from template units.
pub const HELPER_NAMESPACE: &str = "helpers";

/// One named macro contributed by the helper file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperDefinition {
    pub name: String,
    /// Argument names, sorted.
    pub arguments: Vec<String>,
}

/// Parsed helper file plus the base engine every unit is compiled from.
///
/// The base engine already carries the extended filter library and, when a
/// helper file was supplied, the parsed helper document.
#[derive(Debug, Clone)]
pub struct HelperLibrary {
    path: Option<PathBuf>,
    definitions: Vec<HelperDefinition>,
    base: Tera,
}

impl HelperLibrary {
    /// Library with no helper definitions.
    pub fn empty() -> Self {
        HelperLibrary {
            path: None,
            definitions: Vec::new(),
            base: base_engine(),
        }
    }

    /// Load helpers from `path`. `None` or an empty path yields [`HelperLibrary::empty`].
    pub fn load(path: Option<&Path>) -> Result<Self, RenderError> {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return Ok(Self::empty()),
        };
        let source = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::parse(path, &source)
    }

    /// Parse helper source already read from `path`.
    pub fn parse(path: &Path, source: &str) -> Result<Self, RenderError> {
        let helper_err = |source: tera::Error| RenderError::Helper {
            path: path.to_path_buf(),
            source,
        };

        let mut base = base_engine();
        base.add_raw_template(HELPER_TEMPLATE_NAME, source)
            .map_err(helper_err)?;

        let template = base.get_template(HELPER_TEMPLATE_NAME).map_err(helper_err)?;
        let mut definitions: Vec<HelperDefinition> = template
            .macros
            .iter()
            .map(|(name, def)| {
                let mut arguments: Vec<String> = def.args.keys().cloned().collect();
                arguments.sort();
                HelperDefinition {
                    name: name.clone(),
                    arguments,
                }
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(HelperLibrary {
            path: Some(path.to_path_buf()),
            definitions,
            base,
        })
    }

    /// `true` when a helper file was loaded (even one defining no macros).
    pub fn is_loaded(&self) -> bool {
        self.path.is_some()
    }

    /// Helper definitions ordered by name.
    pub fn definitions(&self) -> &[HelperDefinition] {
        &self.definitions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// Engine a template unit is compiled into.
    pub(crate) fn engine(&self) -> Tera {
        self.base.clone()
    }
}

impl Default for HelperLibrary {
    fn default() -> Self {
        Self::empty()
    }
}

fn base_engine() -> Tera {
    let mut tera = Tera::default();
    // Templates produce arbitrary text; never HTML-escape.
    tera.autoescape_on(vec![]);
    filters::register(&mut tera);
    tera
}
