//! Source document parsing and the per-document pipeline entry.

use std::path::{Path, PathBuf};

use crate::classify::{ClassifiedLine, classify_lines};
use crate::dialect::Dialect;
use crate::error::ExportError;
use crate::language::Language;
use crate::segment::{RawCell, segment_cells};

/// A parsed notebook export ready for segmentation.
///
/// Holds the body lines after the header, the detected dialect, the default
/// language, and the document's location relative to the project root. The
/// default language comes from the file extension when recognized, otherwise
/// from the header dialect's host language.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    dialect: Dialect,
    default_language: Language,
    body: Vec<String>,
}

impl SourceDocument {
    /// Parses an export from its text.
    ///
    /// `rel_path` is the document's path relative to the project root; its
    /// parent folder feeds inclusion-directive diagnostics and output
    /// mirroring. Leading blank lines are skipped; the first non-blank line
    /// must be a recognized header or the whole document is rejected.
    pub fn parse(rel_path: impl Into<PathBuf>, text: &str) -> Result<SourceDocument, ExportError> {
        let path = rel_path.into();
        let lines: Vec<&str> = text.lines().collect();
        let header_index = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .ok_or_else(|| ExportError::unrecognized(path.display().to_string()))?;
        let dialect = Dialect::from_header(lines[header_index])
            .ok_or_else(|| ExportError::unrecognized(path.display().to_string()))?;

        let default_language = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Language::from_extension)
            .unwrap_or_else(|| dialect.host_language());

        let body = lines[header_index + 1..]
            .iter()
            .map(|line| line.to_string())
            .collect();

        Ok(SourceDocument {
            path,
            dialect,
            default_language,
            body,
        })
    }

    /// Document path relative to the project root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Folder of the document relative to the project root (empty at root).
    pub fn rel_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Detected comment dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Declared default language.
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Body lines after the header.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Classifies the body lines under the document dialect.
    pub fn classified_lines(&self) -> Vec<ClassifiedLine> {
        classify_lines(self.body.iter().map(String::as_str), self.dialect)
    }

    /// Segments the document into raw cells.
    pub fn raw_cells(&self) -> Vec<RawCell> {
        segment_cells(self.classified_lines())
    }
}
