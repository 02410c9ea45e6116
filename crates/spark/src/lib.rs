#![deny(missing_docs)]
//! nbx Spark engine: directive transformation and multi-format emission.
//!
//! Takes a parsed notebook export and produces one artifact per requested
//! target: a structured interchange notebook, a flat Python or Scala script,
//! or a query-only script, together with per-document line inventory.

/// Target-format emitters (structured document, flat script, query-only).
pub mod emit;
/// Per-document line counters.
pub mod inventory;
/// Directive rewriting over segmented cells.
pub mod transform;

use nbx_core::{ConvertDiagnostics, ExportError, Language, SourceDocument};
use serde::{Deserialize, Serialize};

pub use emit::Emitter;
pub use emit::notebook::{CellKind, DocCell, Ipynb, NotebookArtifact};
pub use inventory::Inventory;
pub use transform::{Cell, Piece, transform_cells};

/// Conversion options shared by every target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Whether embedded-query blocks in flat scripts render as the
    /// execution call; when disabled they collapse to an omission comment.
    #[serde(default = "default_extract_sql")]
    pub extract_sql: bool,
    /// Application name baked into the script prologue's session builder.
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_extract_sql() -> bool {
    true
}

fn default_app_name() -> String {
    "appName".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extract_sql: default_extract_sql(),
            app_name: default_app_name(),
        }
    }
}

/// Output serialization selector, validated once per run by
/// [`Emitter::for_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Structured interchange notebook.
    Notebook,
    /// Flat script in one host language (python or scala).
    Script(Language),
    /// Query-only script.
    QueryOnly,
}

/// One produced output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Structured-document artifact.
    Notebook(NotebookArtifact),
    /// Flat-script text.
    Script(String),
    /// Query-only text.
    Queries(String),
}

impl Artifact {
    /// The artifact rendered as output text (interchange JSON for the
    /// structured form).
    pub fn to_output(&self) -> serde_json::Result<String> {
        match self {
            Artifact::Notebook(notebook) => notebook.to_ipynb_json(),
            Artifact::Script(text) | Artifact::Queries(text) => Ok(text.clone()),
        }
    }
}

/// Result of converting one document to one target.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The produced artifact.
    pub artifact: Artifact,
    /// Line counters for this (document, target) pair.
    pub inventory: Inventory,
    /// Warnings recorded while transforming.
    pub diagnostics: ConvertDiagnostics,
}

/// Converts a parsed document to one target format (entry point).
///
/// The per-document pipeline is fixed and synchronous: segment the body into
/// cells, resolve each cell's language and rewrite its directives, then walk
/// the cells once with the selected emitter. Only an invalid target selector
/// fails; every directive-level problem degrades to passthrough content and
/// is reported through the returned diagnostics.
///
/// # Examples
///
/// ```
/// use nbx_core::SourceDocument;
/// use nbx_spark::{Artifact, Options, Target, convert};
///
/// let text = "# Databricks notebook source\nprint(\"hi\")\n";
/// let doc = SourceDocument::parse("nb1.py", text).unwrap();
/// let conversion = convert(&doc, Target::QueryOnly, &Options::default()).unwrap();
/// assert_eq!(conversion.artifact, Artifact::Queries(String::new()));
/// assert_eq!(conversion.inventory.other_lines, 1);
/// ```
pub fn convert(
    doc: &SourceDocument,
    target: Target,
    options: &Options,
) -> Result<Conversion, ExportError> {
    let emitter = Emitter::for_target(target)?;
    let cells = doc.raw_cells();
    let (cells, diagnostics) = transform_cells(doc, cells);
    log::debug!(
        "{}: {} cells, {} warning(s) for {:?}",
        doc.path().display(),
        cells.len(),
        diagnostics.count(),
        target
    );
    let (artifact, inventory) = emitter.emit(&cells, options);
    Ok(Conversion {
        artifact,
        inventory,
        diagnostics,
    })
}
