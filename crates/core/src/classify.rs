//! Line classification over the dialect token table.
//!
//! Classification is a single fixed-priority lookup per line, tried in the
//! order header > separator > title > directive > continuation > content.
//! There is no lookahead across lines; block structure (query continuations,
//! cell boundaries) is handled by later stages.

use crate::dialect::Dialect;

/// Canonical meaning of a single export line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// The document header line.
    Header,
    /// A cell separator line.
    Separator,
    /// A title annotation. Classified as a directive line but contributes
    /// no payload to cell content.
    Title,
    /// A directive line: marker, then a `%`-prefixed name, then an argument.
    Directive {
        /// Directive name without the leading `%`.
        name: String,
        /// Argument text after the name, one separating space removed.
        arg: String,
        /// Full marker-stripped payload (`%` token included), preserved for
        /// passthrough when no transform applies.
        payload: String,
    },
    /// A marker line without a `%` name: continuation content belonging to
    /// the directive block above it.
    Continuation {
        /// Marker-stripped line text, one separating space removed.
        text: String,
    },
    /// Ordinary content, kept verbatim.
    Content,
}

impl LineKind {
    /// True for directive-family lines (title, directive, continuation).
    pub fn is_directive_family(&self) -> bool {
        matches!(
            self,
            LineKind::Title | LineKind::Directive { .. } | LineKind::Continuation { .. }
        )
    }
}

/// A classified line: the raw text plus its canonical meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Raw line text as read from the export, without trailing newline.
    pub raw: String,
    /// Canonical meaning assigned by the lookup.
    pub kind: LineKind,
}

impl ClassifiedLine {
    /// Classifies one line under the given dialect.
    pub fn new(line: &str, dialect: Dialect) -> ClassifiedLine {
        ClassifiedLine {
            raw: line.to_string(),
            kind: classify_line(line, dialect),
        }
    }

    /// True when the raw line is blank.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Classifies one line under the given dialect.
///
/// # Examples
///
/// ```
/// use nbx_core::{Dialect, LineKind, classify_line};
///
/// let kind = classify_line("# MAGIC %sql SELECT 1", Dialect::Python);
/// assert_eq!(
///     kind,
///     LineKind::Directive {
///         name: "sql".to_string(),
///         arg: "SELECT 1".to_string(),
///         payload: "%sql SELECT 1".to_string(),
///     }
/// );
/// assert_eq!(classify_line("print(1)", Dialect::Python), LineKind::Content);
/// ```
pub fn classify_line(line: &str, dialect: Dialect) -> LineKind {
    let at = line.trim_start();
    if at.trim_end() == dialect.header() {
        return LineKind::Header;
    }
    if at.starts_with(dialect.separator_prefix()) {
        return LineKind::Separator;
    }
    if at.starts_with(dialect.title_prefix()) {
        return LineKind::Title;
    }
    if let Some(payload) = strip_magic(at, dialect) {
        return classify_payload(payload);
    }
    LineKind::Content
}

/// Strips the directive marker, returning the payload after it.
///
/// The marker must be followed by a space (one is consumed) or end the line;
/// anything else (`# MAGICAL`) is not a directive line.
fn strip_magic(line: &str, dialect: Dialect) -> Option<&str> {
    let rest = line.strip_prefix(dialect.magic_prefix())?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

/// Splits a marker-stripped payload into directive or continuation.
fn classify_payload(payload: &str) -> LineKind {
    let trimmed = payload.trim_start();
    let first = trimmed.split_whitespace().next().unwrap_or("");
    if let Some(name) = first.strip_prefix('%') {
        let after_name = &trimmed[first.len()..];
        let arg = after_name.strip_prefix(' ').unwrap_or(after_name);
        return LineKind::Directive {
            name: name.to_string(),
            arg: arg.to_string(),
            payload: payload.to_string(),
        };
    }
    LineKind::Continuation {
        text: payload.to_string(),
    }
}

/// Classifies every line of a document body under one dialect.
pub fn classify_lines<'a, I>(lines: I, dialect: Dialect) -> Vec<ClassifiedLine>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| ClassifiedLine::new(line, dialect))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_header_and_separator() {
        assert_eq!(
            classify_line("# Databricks notebook source", Dialect::Python),
            LineKind::Header
        );
        assert_eq!(
            classify_line("# COMMAND ----------", Dialect::Python),
            LineKind::Separator
        );
        assert_eq!(
            classify_line("-- COMMAND ----------", Dialect::Sql),
            LineKind::Separator
        );
    }

    #[test]
    fn separator_of_another_dialect_is_content() {
        assert_eq!(
            classify_line("-- COMMAND ----------", Dialect::Python),
            LineKind::Content
        );
    }

    #[test]
    fn classifies_title_as_payload_free_directive() {
        assert_eq!(
            classify_line("# DBTITLE 1,Load data", Dialect::Python),
            LineKind::Title
        );
        assert_eq!(
            classify_line("-- DBTITLE 1,Load data", Dialect::Sql),
            LineKind::Title
        );
    }

    #[test]
    fn classifies_directive_with_name_and_arg() {
        let kind = classify_line("# MAGIC %run ./setup/env", Dialect::Python);
        assert_eq!(
            kind,
            LineKind::Directive {
                name: "run".to_string(),
                arg: "./setup/env".to_string(),
                payload: "%run ./setup/env".to_string(),
            }
        );
    }

    #[test]
    fn directive_without_arg_has_empty_arg() {
        let kind = classify_line("// MAGIC %sql", Dialect::Scala);
        assert_eq!(
            kind,
            LineKind::Directive {
                name: "sql".to_string(),
                arg: String::new(),
                payload: "%sql".to_string(),
            }
        );
    }

    #[test]
    fn marker_line_without_name_is_continuation() {
        assert_eq!(
            classify_line("# MAGIC SELECT * FROM t", Dialect::Python),
            LineKind::Continuation {
                text: "SELECT * FROM t".to_string()
            }
        );
        // Bare marker is an empty continuation line.
        assert_eq!(
            classify_line("# MAGIC", Dialect::Python),
            LineKind::Continuation {
                text: String::new()
            }
        );
    }

    #[test]
    fn continuation_keeps_inner_indentation() {
        // Only the single separating space after the marker is consumed.
        assert_eq!(
            classify_line("# MAGIC   WHERE x > 1", Dialect::Python),
            LineKind::Continuation {
                text: "  WHERE x > 1".to_string()
            }
        );
    }

    #[test]
    fn fused_marker_is_content() {
        assert_eq!(classify_line("# MAGICAL text", Dialect::Python), LineKind::Content);
    }

    #[test]
    fn blank_and_plain_lines_are_content() {
        assert_eq!(classify_line("", Dialect::Python), LineKind::Content);
        assert_eq!(classify_line("   ", Dialect::Python), LineKind::Content);
        assert_eq!(classify_line("print(1)", Dialect::Python), LineKind::Content);
        // A plain comment is content too; only the fixed tokens are structural.
        assert_eq!(classify_line("# plain comment", Dialect::Python), LineKind::Content);
    }

    #[test]
    fn unknown_directive_name_still_classifies_as_directive() {
        // Demotion to content happens at transform time; the classifier
        // records any %-token so the language resolver can see it.
        let kind = classify_line("# MAGIC %fs ls /tmp", Dialect::Python);
        assert_eq!(
            kind,
            LineKind::Directive {
                name: "fs".to_string(),
                arg: "ls /tmp".to_string(),
                payload: "%fs ls /tmp".to_string(),
            }
        );
    }

    #[test]
    fn directive_after_extra_spaces_keeps_payload() {
        let kind = classify_line("# MAGIC   %sql SELECT 1", Dialect::Python);
        match kind {
            LineKind::Directive { name, arg, payload } => {
                assert_eq!(name, "sql");
                assert_eq!(arg, "SELECT 1");
                assert_eq!(payload, "  %sql SELECT 1");
            }
            other => panic!("Expected directive, got: {:?}", other),
        }
    }
}
