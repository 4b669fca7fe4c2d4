//! Template Node Loader — compiles every file under a template root.
//!
//! Each file becomes a [`TemplateUnit`] with its own engine instance, cloned
//! from the [`HelperLibrary`] base so the helper document is parsed once and
//! shared read-only by all units. When a helper file is loaded, the loader
//! prefixes every unit with
//!
//! ```text
//! {% import "__mipha_helpers__" as helpers %}
//! ```
//!
//! Macro calls are checked at load time: a unit may only call macros through
//! `self` or an imported namespace, and `helpers::x` must name a macro the
//! helper file defines.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};

use tera::ast::{Expr, ExprVal, FunctionCall, MacroCall, Node};
use tera::{Context, Tera};

use crate::error::{io_err, RenderError};
use crate::helpers::{HelperDefinition, HelperLibrary, HELPER_NAMESPACE, HELPER_TEMPLATE_NAME};

// ---------------------------------------------------------------------------
// TemplateUnit
// ---------------------------------------------------------------------------

/// One compiled template file, ready to be executed against many contexts.
#[derive(Debug)]
pub struct TemplateUnit {
    full_path: PathBuf,
    relative_dir: PathBuf,
    file_name: OsString,
    name: String,
    tera: Tera,
}

impl TemplateUnit {
    /// Read and compile the file at `full_path`.
    ///
    /// `relative_dir` is the directory of the file relative to the template
    /// root (empty for files directly under the root).
    pub fn compile(
        full_path: &Path,
        relative_dir: &Path,
        library: &HelperLibrary,
    ) -> Result<Self, RenderError> {
        let file_name = full_path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| {
                io_err(
                    full_path,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "template has no file name"),
                )
            })?;
        let name = file_name.to_string_lossy().into_owned();
        let body = std::fs::read_to_string(full_path).map_err(|e| io_err(full_path, e))?;

        let source = if library.is_loaded() {
            format!("{{% import \"{HELPER_TEMPLATE_NAME}\" as {HELPER_NAMESPACE} %}}{body}")
        } else {
            body
        };

        let compile_err = |source: tera::Error| RenderError::Compile {
            path: full_path.to_path_buf(),
            source,
        };

        let mut tera = library.engine();
        tera.add_raw_template(&name, &source).map_err(compile_err)?;

        {
            let template = tera.get_template(&name).map_err(compile_err)?;
            check_macro_calls(&template.ast, full_path, library)?;
        }

        Ok(TemplateUnit {
            full_path: full_path.to_path_buf(),
            relative_dir: relative_dir.to_path_buf(),
            file_name,
            name,
            tera,
        })
    }

    /// Absolute (or caller-relative) path of the source file.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Directory of the source file relative to the template root.
    pub fn relative_dir(&self) -> &Path {
        &self.relative_dir
    }

    /// Base name of the source file; also the output file name.
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    /// Path relative to the template root, i.e. `relative_dir/file_name`.
    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir.join(&self.file_name)
    }

    /// Execute the unit against `ctx`, streaming output into `out`.
    pub fn render_to<W: Write>(&self, ctx: &Context, out: W) -> Result<(), RenderError> {
        self.tera
            .render_to(&self.name, ctx, out)
            .map_err(|source| RenderError::Render {
                path: self.full_path.clone(),
                source,
            })
    }

    /// Execute the unit against `ctx` and return the output.
    pub fn render(&self, ctx: &Context) -> Result<String, RenderError> {
        self.tera
            .render(&self.name, ctx)
            .map_err(|source| RenderError::Render {
                path: self.full_path.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Macro call validation
// ---------------------------------------------------------------------------

fn check_macro_calls(
    ast: &[Node],
    path: &Path,
    library: &HelperLibrary,
) -> Result<(), RenderError> {
    let mut namespaces = vec!["self"];
    for node in ast {
        if let Node::ImportMacro(_, _, namespace) = node {
            namespaces.push(namespace.as_str());
        }
    }

    let mut calls = MacroCalls::default();
    calls.visit_nodes(ast);

    // Tera evaluates math operands as numbers and cannot expand a bare macro call there.
    if let Some(call) = calls.math_operands.first() {
        return Err(RenderError::MacroInMath {
            path: path.to_path_buf(),
            namespace: call.namespace.clone(),
            name: call.name.clone(),
        });
    }

    for call in calls.all {
        if !namespaces.contains(&call.namespace.as_str()) {
            return Err(RenderError::UnknownNamespace {
                path: path.to_path_buf(),
                namespace: call.namespace.clone(),
                name: call.name.clone(),
            });
        }
        if call.namespace == HELPER_NAMESPACE && !library.contains(&call.name) {
            return Err(RenderError::UnknownHelper {
                path: path.to_path_buf(),
                name: call.name.clone(),
            });
        }
    }
    Ok(())
}

/// Every macro call reachable from a template's AST.
#[derive(Default)]
struct MacroCalls<'a> {
    all: Vec<&'a MacroCall>,
    /// Unfiltered calls used directly as an operand of `+ - * / %`.
    math_operands: Vec<&'a MacroCall>,
}

impl<'a> MacroCalls<'a> {
    fn visit_nodes(&mut self, nodes: &'a [Node]) {
        for node in nodes {
            match node {
                Node::VariableBlock(_, expr) => self.visit_expr(expr),
                Node::Set(_, set) => self.visit_expr(&set.value),
                Node::MacroDefinition(_, def, _) => self.visit_nodes(&def.body),
                Node::FilterSection(_, section, _) => {
                    self.visit_function(&section.filter);
                    self.visit_nodes(&section.body);
                }
                Node::Block(_, block, _) => self.visit_nodes(&block.body),
                Node::Forloop(_, forloop, _) => {
                    self.visit_expr(&forloop.container);
                    self.visit_nodes(&forloop.body);
                    if let Some(body) = &forloop.empty_body {
                        self.visit_nodes(body);
                    }
                }
                Node::If(cond, _) => {
                    for (_, expr, body) in &cond.conditions {
                        self.visit_expr(expr);
                        self.visit_nodes(body);
                    }
                    if let Some((_, body)) = &cond.otherwise {
                        self.visit_nodes(body);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        self.visit_val(&expr.val);
        for filter in &expr.filters {
            self.visit_function(filter);
        }
    }

    fn visit_function(&mut self, call: &'a FunctionCall) {
        for arg in call.args.values() {
            self.visit_expr(arg);
        }
    }

    fn visit_val(&mut self, val: &'a ExprVal) {
        match val {
            ExprVal::MacroCall(call) => {
                self.all.push(call);
                for arg in call.args.values() {
                    self.visit_expr(arg);
                }
            }
            ExprVal::Math(math) => {
                for operand in [&math.lhs, &math.rhs] {
                    match &operand.val {
                        ExprVal::MacroCall(call) if operand.filters.is_empty() => {
                            self.math_operands.push(call)
                        }
                        _ => {}
                    }
                    self.visit_expr(operand);
                }
            }
            ExprVal::Logic(logic) => {
                self.visit_expr(&logic.lhs);
                self.visit_expr(&logic.rhs);
            }
            ExprVal::In(in_expr) => {
                self.visit_expr(&in_expr.lhs);
                self.visit_expr(&in_expr.rhs);
            }
            ExprVal::Test(test) => {
                for arg in &test.args {
                    self.visit_expr(arg);
                }
            }
            ExprVal::FunctionCall(call) => self.visit_function(call),
            ExprVal::Array(items) => {
                for item in items {
                    self.visit_expr(item);
                }
            }
            ExprVal::StringConcat(concat) => {
                for value in &concat.values {
                    self.visit_val(value);
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateCollection
// ---------------------------------------------------------------------------

/// Every template unit under a source root, plus the helpers they share.
#[derive(Debug)]
pub struct TemplateCollection {
    source_root: PathBuf,
    helpers: Vec<HelperDefinition>,
    units: Vec<TemplateUnit>,
}

impl TemplateCollection {
    /// Walk `root` and compile every regular file into a [`TemplateUnit`].
    ///
    /// Fails fast: the first traversal, read, compile or helper-merge error
    /// aborts the load and no partial collection is returned.
    pub fn load(root: &Path, library: &HelperLibrary) -> Result<Self, RenderError> {
        let mut files = Vec::new();
        collect_template_files(root, Path::new(""), &mut files)?;

        let units = files
            .iter()
            .map(|(full_path, relative_dir)| TemplateUnit::compile(full_path, relative_dir, library))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TemplateCollection {
            source_root: root.to_path_buf(),
            helpers: library.definitions().to_vec(),
            units,
        })
    }

    /// Load the helper file (if any), then the template tree.
    pub fn load_with_helper(root: &Path, helper: Option<&Path>) -> Result<Self, RenderError> {
        let library = HelperLibrary::load(helper)?;
        Self::load(root, &library)
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn helpers(&self) -> &[HelperDefinition] {
        &self.helpers
    }

    pub fn units(&self) -> &[TemplateUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateUnit> {
        self.units.iter()
    }
}

/// Recursively collect `(full_path, relative_dir)` for every regular file.
///
/// Entries are visited in file-name order. Symlinks to files are followed;
/// symlinked directories are not descended into.
fn collect_template_files(
    dir: &Path,
    relative_dir: &Path,
    out: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), RenderError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            collect_template_files(&path, &relative_dir.join(entry.file_name()), out)?;
        } else if file_type.is_file() {
            out.push((path, relative_dir.to_path_buf()));
        } else if file_type.is_symlink() {
            let target = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
            if target.is_file() {
                out.push((path, relative_dir.to_path_buf()));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
