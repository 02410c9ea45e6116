//! Structured-document emission.
//!
//! Every cell becomes one output unit tagged code or documentation, with
//! language metadata attached per cell. Nothing is dropped: empty cells and
//! cells of unrecognized language are preserved so the artifact remains a
//! faithful, re-segmentable account of the source. The artifact also
//! serializes to interchange-notebook JSON (nbformat 4.4).

use nbx_core::Language;
use serde::{Deserialize, Serialize};

use crate::emit::{QueryStyle, cell_text};
use crate::inventory::Inventory;
use crate::transform::Cell;

/// Kind tag of a structured-document cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Executable content.
    Code,
    /// Documentation content.
    Documentation,
}

/// One unit of the structured-document artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocCell {
    /// Code or documentation.
    pub kind: CellKind,
    /// Cell language; `None` for documentation cells.
    pub language: Option<Language>,
    /// Transformed cell text, blank lines preserved.
    pub source_text: String,
}

/// Structured-document artifact: every source cell, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookArtifact {
    /// Cells in source order.
    pub cells: Vec<DocCell>,
}

/// Emits the structured-document artifact.
///
/// Query cells keep their raw coalesced body (the execution wrapper belongs
/// to flat scripts); cells of unrecognized language keep their
/// marker-stripped directive text and are charged to the "other" bucket.
pub fn emit(cells: &[Cell]) -> (NotebookArtifact, Inventory) {
    let mut inventory = Inventory::default();
    let mut out = Vec::with_capacity(cells.len());
    for cell in cells {
        let doc_cell = match cell.language {
            Language::Markdown => {
                inventory.count_documentation(cell);
                DocCell {
                    kind: CellKind::Documentation,
                    language: None,
                    source_text: cell_text(cell, QueryStyle::Raw),
                }
            }
            Language::Sql => {
                inventory.count_query(cell);
                code_cell(cell)
            }
            Language::Python | Language::Scala => {
                inventory.count_code(cell);
                code_cell(cell)
            }
            Language::Unknown => {
                inventory.count_other(cell);
                code_cell(cell)
            }
        };
        out.push(doc_cell);
    }
    (NotebookArtifact { cells: out }, inventory)
}

fn code_cell(cell: &Cell) -> DocCell {
    DocCell {
        kind: CellKind::Code,
        language: Some(cell.language),
        source_text: cell_text(cell, QueryStyle::Raw),
    }
}

impl NotebookArtifact {
    /// Maps the artifact onto the interchange-notebook document model.
    pub fn to_ipynb(&self) -> Ipynb {
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell.kind {
                CellKind::Documentation => IpynbCell::Markdown {
                    metadata: MarkdownCellMetadata {},
                    source: source_lines(&cell.source_text),
                },
                CellKind::Code => IpynbCell::Code {
                    metadata: CodeCellMetadata {
                        language: cell.language.map(|language| language.as_str().to_string()),
                    },
                    source: source_lines(&cell.source_text),
                    outputs: Vec::new(),
                    execution_count: None,
                },
            })
            .collect();
        Ipynb {
            cells,
            metadata: IpynbMetadata::default(),
            nbformat: 4,
            nbformat_minor: 4,
        }
    }

    /// Serializes the interchange-notebook form to pretty JSON.
    pub fn to_ipynb_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_ipynb())
    }
}

/// Splits cell text into interchange source lines; every line keeps its
/// newline except the last.
fn source_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Interchange-notebook document (nbformat 4.4).
#[derive(Debug, Clone, Serialize)]
pub struct Ipynb {
    /// Notebook cells in order.
    pub cells: Vec<IpynbCell>,
    /// Kernel and language metadata.
    pub metadata: IpynbMetadata,
    /// Major format version.
    pub nbformat: u32,
    /// Minor format version.
    pub nbformat_minor: u32,
}

/// Notebook-level metadata block.
#[derive(Debug, Clone, Serialize)]
pub struct IpynbMetadata {
    /// Kernel descriptor.
    pub kernelspec: Kernelspec,
    /// Kernel language descriptor.
    pub language_info: LanguageInfo,
}

impl Default for IpynbMetadata {
    fn default() -> Self {
        Self {
            kernelspec: Kernelspec {
                display_name: "Python 3".to_string(),
                language: "python".to_string(),
                name: "python3".to_string(),
            },
            language_info: LanguageInfo {
                name: "python".to_string(),
                version: "3.8".to_string(),
            },
        }
    }
}

/// Kernel descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Kernelspec {
    /// Human-readable kernel name.
    pub display_name: String,
    /// Kernel language identifier.
    pub language: String,
    /// Kernel registry name.
    pub name: String,
}

/// Kernel language descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    /// Language identifier.
    pub name: String,
    /// Language version.
    pub version: String,
}

/// One interchange-notebook cell.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum IpynbCell {
    /// Executable cell.
    Code {
        /// Per-cell metadata carrying the cell language.
        metadata: CodeCellMetadata,
        /// Source lines, newline-terminated except the last.
        source: Vec<String>,
        /// Captured outputs; always empty for converted cells.
        outputs: Vec<serde_json::Value>,
        /// Execution ordinal; always null for converted cells.
        execution_count: Option<u32>,
    },
    /// Documentation cell.
    Markdown {
        /// Empty metadata block.
        metadata: MarkdownCellMetadata,
        /// Source lines, newline-terminated except the last.
        source: Vec<String>,
    },
}

/// Code-cell metadata: the cell language when one is attached.
#[derive(Debug, Clone, Serialize)]
pub struct CodeCellMetadata {
    /// Cell language identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Markdown-cell metadata, always empty.
#[derive(Debug, Clone, Serialize)]
pub struct MarkdownCellMetadata {}
