//! Core error and diagnostic types.

use thiserror::Error;

/// Errors that reject a document or a conversion outright.
///
/// Everything else degrades: malformed directives become plain content and
/// are reported through [`ConvertDiagnostics`], and cells a target cannot
/// render are dropped and counted, never surfaced as errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error while reading an export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The document carries no recognized export header.
    #[error("not a recognized notebook export: {path}")]
    UnrecognizedFormat {
        /// Offending document path.
        path: String,
    },
    /// The requested target cannot be rendered (configuration error).
    #[error("unsupported target: {reason}")]
    UnsupportedTarget {
        /// What made the target invalid.
        reason: String,
    },
}

impl ExportError {
    /// Rejection for a document without a recognized header.
    pub fn unrecognized(path: impl Into<String>) -> Self {
        Self::UnrecognizedFormat { path: path.into() }
    }

    /// Configuration error for an unrenderable target.
    pub fn unsupported_target(reason: impl Into<String>) -> Self {
        Self::UnsupportedTarget {
            reason: reason.into(),
        }
    }
}

/// A recoverable conversion warning (degraded directive, path escape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertWarning {
    /// 0-indexed ordinal of the cell where the degradation happened,
    /// when known.
    pub cell: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl ConvertWarning {
    /// Warning tied to a cell ordinal.
    pub fn in_cell(cell: usize, message: impl Into<String>) -> Self {
        Self {
            cell: Some(cell),
            message: message.into(),
        }
    }

    /// Warning without a location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            cell: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cell {
            Some(cell) => write!(f, "cell {}: {}", cell, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Warnings collected across one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertDiagnostics {
    /// Degradations recorded during transform and emit.
    pub warnings: Vec<ConvertWarning>,
}

impl ConvertDiagnostics {
    /// Creates an empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, warning: ConvertWarning) {
        self.warnings.push(warning);
    }

    /// Records a warning tied to a cell ordinal.
    pub fn warn_in_cell(&mut self, cell: usize, message: impl Into<String>) {
        self.warnings.push(ConvertWarning::in_cell(cell, message));
    }

    /// True when any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of recorded warnings.
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
