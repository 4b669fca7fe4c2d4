//! Context Set Loader.
//!
//! # Document layout
//!
//! ```yaml
//! configurations:
//!   ctx1:
//!     Name: World
//!   ctx2:
//!     Name: Go
//! ```
//!
//! Every entry under `configurations` is a context; its value is passed
//! as-is into template evaluation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ContextError;
use crate::types::{ContextName, ContextSet};

/// Key of the section holding the contexts.
pub const CONFIGURATIONS_KEY: &str = "configurations";

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    configurations: Option<serde_yaml::Mapping>,
}

/// Load a [`ContextSet`] from the YAML document at `path`.
///
/// Returns `ContextError::Io` if the file cannot be read,
/// `ContextError::Parse` (with path + line context) if the YAML is malformed,
/// `ContextError::MissingSection` if `configurations` is absent or empty.
pub fn load_at(path: &Path) -> Result<ContextSet, ContextError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

/// Parse an already-read configuration document. `path` is used for error reporting.
pub fn parse(path: &Path, contents: &str) -> Result<ContextSet, ContextError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|source| ContextError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // An empty document carries no section at all.
    if value.is_null() {
        return Err(ContextError::MissingSection {
            path: path.to_path_buf(),
        });
    }

    let doc: ConfigDocument =
        serde_yaml::from_value(value).map_err(|source| ContextError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let section = match doc.configurations {
        Some(section) if !section.is_empty() => section,
        _ => {
            return Err(ContextError::MissingSection {
                path: path.to_path_buf(),
            })
        }
    };

    let mut contexts = BTreeMap::new();
    for (key, value) in section {
        let name = context_name(path, &key)?;
        if !name.is_valid_dir_name() {
            return Err(ContextError::InvalidContextName {
                path: path.to_path_buf(),
                name: name.0,
            });
        }
        if contexts.contains_key(&name) {
            return Err(ContextError::DuplicateContextName {
                path: path.to_path_buf(),
                name: name.0,
            });
        }
        contexts.insert(name, value);
    }

    Ok(ContextSet {
        path: path.to_path_buf(),
        contexts,
    })
}

/// Scalar keys name a context by their text; `2024:` and `true:` are valid names.
fn context_name(path: &Path, key: &serde_yaml::Value) -> Result<ContextName, ContextError> {
    use serde_yaml::Value;

    let text = match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            let kind = match other {
                Value::Null => "null",
                Value::Sequence(_) => "sequence",
                Value::Mapping(_) => "mapping",
                _ => "tagged value",
            };
            return Err(ContextError::UnsupportedContextKey {
                path: path.to_path_buf(),
                kind,
            });
        }
    };
    Ok(ContextName(text))
}
