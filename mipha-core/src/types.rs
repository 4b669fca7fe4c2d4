//! Domain types shared by the loaders and the render engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of one context; doubles as the output subdirectory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextName(pub String);

impl ContextName {
    /// `true` when the name is a single usable directory component.
    pub fn is_valid_dir_name(&self) -> bool {
        let name = self.0.as_str();
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ContextName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContextName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<Path> for ContextName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Parameters of a single run, built by the caller and passed into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Root of the template tree.
    pub templates: PathBuf,
    /// YAML document holding the `configurations` section.
    pub config: PathBuf,
    /// Optional helper file with shared macros.
    pub helper: Option<PathBuf>,
    /// Render root; wiped and recreated by every run.
    pub output: PathBuf,
    /// Evaluate every template without touching the output root.
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(
        templates: impl Into<PathBuf>,
        config: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        RunConfig {
            templates: templates.into(),
            config: config.into(),
            helper: None,
            output: output.into(),
            dry_run: false,
        }
    }

    /// Set the helper file. An empty path means "no helper".
    pub fn with_helper(mut self, helper: impl Into<PathBuf>) -> Self {
        let helper = helper.into();
        self.helper = if helper.as_os_str().is_empty() {
            None
        } else {
            Some(helper)
        };
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The helper path, if one was supplied and is non-empty.
    pub fn helper_path(&self) -> Option<&Path> {
        self.helper
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Context set
// ---------------------------------------------------------------------------

/// Named variable sets loaded from the configuration document.
///
/// Contexts are kept in a sorted map, so iteration is ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSet {
    /// Path of the document the set was loaded from.
    pub path: PathBuf,
    /// Context name → arbitrary variable tree.
    pub contexts: BTreeMap<ContextName, serde_yaml::Value>,
}

impl ContextSet {
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContextName, &serde_yaml::Value)> {
        self.contexts.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &ContextName> {
        self.contexts.keys()
    }

    pub fn get(&self, name: &str) -> Option<&serde_yaml::Value> {
        self.contexts.get(&ContextName::from(name))
    }
}
