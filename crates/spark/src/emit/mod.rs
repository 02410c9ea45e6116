//! Target-format emitters.
//!
//! - `notebook`: structured-document artifact and its interchange JSON form.
//! - `script`: flat-script emission for one host language.
//! - `queries`: query-only emission.
//!
//! One emitter is selected per run from the target selector; each walks the
//! transformed cells once and returns the artifact together with the line
//! inventory for the (document, target) pair.

/// Structured-document artifact and its interchange JSON form.
pub mod notebook;
/// Query-only emission.
pub mod queries;
/// Flat-script emission for one host language.
pub mod script;

use nbx_core::{ExportError, Language};

use crate::inventory::Inventory;
use crate::transform::{Cell, Piece, include, install, query};
use crate::{Artifact, Options, Target};

/// The fixed emitter set, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitter {
    /// Structured-document target: every cell kept, none dropped.
    Structured,
    /// Flat-script target for one host language.
    Script(Language),
    /// Query-only target.
    QueryOnly,
}

impl Emitter {
    /// Selects the emitter for a target, rejecting selectors no emitter can
    /// render (the only fatal configuration error in a conversion).
    pub fn for_target(target: Target) -> Result<Emitter, ExportError> {
        match target {
            Target::Notebook => Ok(Emitter::Structured),
            Target::Script(language) => match language {
                Language::Python | Language::Scala => Ok(Emitter::Script(language)),
                other => Err(ExportError::unsupported_target(format!(
                    "no flat-script rendering for language `{other}`"
                ))),
            },
            Target::QueryOnly => Ok(Emitter::QueryOnly),
        }
    }

    /// Emits the transformed cells, returning the artifact and inventory.
    pub fn emit(self, cells: &[Cell], options: &Options) -> (Artifact, Inventory) {
        match self {
            Emitter::Structured => {
                let (artifact, inventory) = notebook::emit(cells);
                (Artifact::Notebook(artifact), inventory)
            }
            Emitter::Script(language) => {
                let (text, inventory) = script::emit(cells, language, options);
                (Artifact::Script(text), inventory)
            }
            Emitter::QueryOnly => {
                let (text, inventory) = queries::emit(cells);
                (Artifact::Queries(text), inventory)
            }
        }
    }
}

/// Rendering chosen for query pieces by the active emitter.
#[derive(Debug, Clone, Copy)]
pub(crate) enum QueryStyle<'a> {
    /// The execution-and-display call; when extraction is disabled the
    /// block collapses to an omission comment instead.
    Execute {
        /// Whether query extraction is enabled.
        extract: bool,
        /// Comment prefix for the omission form.
        omit_prefix: &'a str,
    },
    /// Raw query text only, no wrapper.
    Raw,
}

/// Renders a cell's pieces into one text block, newline-joined.
///
/// Import-all pieces follow the cell language's syntax; query pieces follow
/// the given style. The emitters never rewrite directive semantics beyond
/// this choice of concrete form.
pub(crate) fn cell_text(cell: &Cell, style: QueryStyle) -> String {
    let scala = cell.language == Language::Scala;
    let segments: Vec<String> = cell
        .pieces
        .iter()
        .map(|piece| match piece {
            Piece::Text(text) => text.clone(),
            Piece::ImportAll { module } => include::render_import(module, scala),
            Piece::Query { body } => match style {
                QueryStyle::Execute { extract: true, .. } => query::render_execution(body),
                QueryStyle::Execute {
                    extract: false,
                    omit_prefix,
                } => format!("{omit_prefix} SQL CELL OMITTED"),
                QueryStyle::Raw => body.clone(),
            },
            Piece::InstallHint { package, version } => install::render_hint(package, version),
        })
        .collect();
    segments.join("\n")
}

/// Prefixes every line of a block with a line-comment marker; blank lines
/// take the bare marker.
pub(crate) fn comment_block(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops leading and trailing blank lines, keeping interior ones.
pub(crate) fn trim_blank_edges(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    lines[start..=end].join("\n")
}
