#![deny(missing_docs)]
//! nbx core: notebook-export dialect tables, line classification, and cell
//! segmentation.

/// Line classification over the dialect token table.
pub mod classify;
/// Dialect detection and fixed token tables.
pub mod dialect;
/// Source document parsing and the per-document pipeline entry.
pub mod document;
/// Core error and diagnostic types.
pub mod error;
/// Effective-language tags and per-cell resolution.
pub mod language;
/// Cell segmentation over the classified line stream.
pub mod segment;

pub use classify::{ClassifiedLine, LineKind, classify_line, classify_lines};
pub use dialect::{ALL_DIALECTS, Dialect};
pub use document::SourceDocument;
pub use error::{ConvertDiagnostics, ConvertWarning, ExportError};
pub use language::{Language, resolve_cell_language};
pub use segment::{RawCell, segment_cells};
