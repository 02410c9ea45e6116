//! Effective-language tags and per-cell resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::LineKind;
use crate::segment::RawCell;

/// Effective language of a cell or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python cells and scripts.
    Python,
    /// Scala cells and scripts.
    Scala,
    /// The embedded query language.
    Sql,
    /// Documentation cells.
    Markdown,
    /// A language-switch directive named no recognized language.
    Unknown,
}

impl Language {
    /// Parses a directive language token (`py` is an alias for `python`).
    pub fn from_token(token: &str) -> Option<Language> {
        match token.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "scala" => Some(Language::Scala),
            "sql" => Some(Language::Sql),
            "md" => Some(Language::Markdown),
            _ => None,
        }
    }

    /// Language implied by a file extension, if recognized.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(Language::Python),
            "scala" => Some(Language::Scala),
            "sql" => Some(Language::Sql),
            _ => None,
        }
    }

    /// Identifier used in interchange metadata and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Scala => "scala",
            Language::Sql => "sql",
            Language::Markdown => "markdown",
            Language::Unknown => "unknown",
        }
    }

    /// Line-comment prefix used when rendering this language.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            Language::Python => "#",
            Language::Scala => "//",
            Language::Sql => "--",
            Language::Markdown | Language::Unknown => "#",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directive names that never decide a cell's language.
fn is_non_language_directive(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "run")
}

/// Resolves a cell's effective language.
///
/// The cell's lines are scanned in order, skipping blanks and title lines.
/// The first language-switch or query directive sets the tag; a directive
/// naming an unrecognized language tags the cell [`Language::Unknown`];
/// known non-language directives (`%run`) never stop the scan. Cells with no
/// deciding directive before their first non-blank content line take the
/// document default.
pub fn resolve_cell_language(cell: &RawCell, default: Language) -> Language {
    for line in &cell.lines {
        match &line.kind {
            LineKind::Title => continue,
            LineKind::Directive { name, .. } => {
                if is_non_language_directive(name) {
                    continue;
                }
                return Language::from_token(name).unwrap_or(Language::Unknown);
            }
            // An orphan continuation (no directive above it) acts as content.
            LineKind::Continuation { text } => {
                if text.trim().is_empty() {
                    continue;
                }
                return default;
            }
            LineKind::Content => {
                if line.is_blank() {
                    continue;
                }
                return default;
            }
            LineKind::Header | LineKind::Separator => continue,
        }
    }
    default
}
