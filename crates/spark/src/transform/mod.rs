//! Directive rewriting over segmented cells.
//!
//! - `include`: inclusion-directive path algebra and import rendering.
//! - `install`: package-install hint detection and rendering.
//! - `query`: embedded-query block coalescing and the execution form.
//!
//! The transformer turns each raw cell into an ordered list of [`Piece`]s
//! carrying semantics, not target syntax: an inclusion becomes an import-all
//! node, an embedded query becomes a query node holding its coalesced body.
//! Emitters pick the concrete rendering per target; the piece list itself is
//! final and never reordered.

/// Inclusion-directive path algebra and import rendering.
pub mod include;
/// Package-install hint detection and rendering.
pub mod install;
/// Embedded-query block coalescing and the execution form.
pub mod query;

use nbx_core::{ConvertDiagnostics, Language, LineKind, RawCell, SourceDocument, resolve_cell_language};

use crate::transform::install::InstallScan;

/// One semantic unit of transformed cell content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// A verbatim content line (markers already stripped where applicable).
    Text(String),
    /// An import-all statement produced from an inclusion directive.
    ImportAll {
        /// Dotted module identifier.
        module: String,
    },
    /// A coalesced embedded-query block.
    Query {
        /// Joined query body, outer whitespace trimmed.
        body: String,
    },
    /// A commented package-installation hint.
    InstallHint {
        /// Extracted package name.
        package: String,
        /// Extracted version string.
        version: String,
    },
}

/// A transformed cell: resolved language plus the ordered piece list.
///
/// `line_count` is the number of raw input lines the cell spanned; inventory
/// buckets charge whole cells by this count, minus `demoted_lines` which are
/// charged to "other" instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// 0-indexed cell ordinal in source order.
    pub index: usize,
    /// Effective language tag.
    pub language: Language,
    /// Transformed content in source order.
    pub pieces: Vec<Piece>,
    /// Raw input lines this cell spanned (separators excluded).
    pub line_count: usize,
    /// Lines degraded to passthrough content, charged to the "other" bucket.
    pub demoted_lines: usize,
}

impl Cell {
    /// True when the cell spanned no input lines (consecutive separators).
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// True when every piece is blank text; script-style targets skip such
    /// cells the same way they skip empty ones.
    pub fn is_blank(&self) -> bool {
        self.pieces.iter().all(|piece| match piece {
            Piece::Text(text) => text.trim().is_empty(),
            _ => false,
        })
    }
}

/// Transforms raw cells into final cells, resolving languages and rewriting
/// directives.
///
/// Degradations (unparseable inclusion arguments, install calls whose fields
/// cannot be extracted, inclusions climbing above the project root) never
/// fail the conversion; they are recorded as warnings and the affected line
/// passes through as content.
pub fn transform_cells(
    doc: &SourceDocument,
    cells: Vec<RawCell>,
) -> (Vec<Cell>, ConvertDiagnostics) {
    let mut diagnostics = ConvertDiagnostics::new();
    let folder_depth = doc.rel_dir().components().count();
    let transformed = cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| transform_cell(index, cell, doc, folder_depth, &mut diagnostics))
        .collect();
    (transformed, diagnostics)
}

fn transform_cell(
    index: usize,
    cell: RawCell,
    doc: &SourceDocument,
    folder_depth: usize,
    diagnostics: &mut ConvertDiagnostics,
) -> Cell {
    let language = resolve_cell_language(&cell, doc.default_language());
    let line_count = cell.len();
    let mut pieces = Vec::new();
    let mut demoted_lines = 0;

    let lines = &cell.lines;
    let mut at = 0;
    while at < lines.len() {
        let line = &lines[at];
        at += 1;
        match &line.kind {
            LineKind::Title => {}
            LineKind::Directive { name, arg, payload } => {
                if name.eq_ignore_ascii_case("run") {
                    match include::parse_include(arg) {
                        Some(inc) => {
                            if inc.levels_up > folder_depth {
                                diagnostics.warn_in_cell(
                                    index,
                                    format!(
                                        "inclusion `{arg}` climbs {} folder(s) above the project root",
                                        inc.levels_up - folder_depth
                                    ),
                                );
                            }
                            pieces.push(Piece::ImportAll { module: inc.module });
                        }
                        None => {
                            diagnostics.warn_in_cell(
                                index,
                                format!("unparseable inclusion argument `{arg}`, kept as content"),
                            );
                            pieces.push(Piece::Text(payload.clone()));
                            demoted_lines += 1;
                        }
                    }
                } else if name.eq_ignore_ascii_case("sql") {
                    let (body, consumed) = query::coalesce_block(arg, &lines[at..]);
                    pieces.push(Piece::Query { body });
                    at += consumed;
                } else if Language::from_token(name).is_some() {
                    // Language switch: the token itself vanishes; a same-line
                    // payload becomes the first content line.
                    if !arg.trim().is_empty() {
                        pieces.push(Piece::Text(arg.clone()));
                    }
                } else {
                    // Unrecognized directive: content with the marker stripped.
                    log::debug!("cell {index}: unrecognized directive `%{name}` kept as content");
                    pieces.push(Piece::Text(payload.clone()));
                }
            }
            LineKind::Continuation { text } => pieces.push(Piece::Text(text.clone())),
            LineKind::Content => match install::scan_line(&line.raw) {
                InstallScan::Hint { package, version } => {
                    pieces.push(Piece::InstallHint { package, version });
                }
                InstallScan::Malformed => {
                    diagnostics.warn_in_cell(
                        index,
                        "install call without an extractable package/version, kept as content",
                    );
                    pieces.push(Piece::Text(line.raw.clone()));
                }
                InstallScan::NotInstall => pieces.push(Piece::Text(line.raw.clone())),
            },
            // Structural lines never reach cells.
            LineKind::Header | LineKind::Separator => {}
        }
    }

    Cell {
        index,
        language,
        pieces,
        line_count,
        demoted_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, body: &str) -> SourceDocument {
        let text = format!("# Databricks notebook source\n{body}");
        SourceDocument::parse(path, &text).expect("valid export")
    }

    fn transformed(path: &str, body: &str) -> (Vec<Cell>, ConvertDiagnostics) {
        let doc = doc(path, body);
        let cells = doc.raw_cells();
        transform_cells(&doc, cells)
    }

    #[test]
    fn inclusion_becomes_import_all_piece() {
        let (cells, diagnostics) = transformed("proj/nb1.py", "# MAGIC %run ./sub/helper\n");
        assert_eq!(
            cells[0].pieces,
            vec![Piece::ImportAll {
                module: "sub.helper".to_string()
            }]
        );
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn inclusion_does_not_change_cell_language() {
        let (cells, _) = transformed("proj/nb1.py", "# MAGIC %run ./env\nx = 1\n");
        assert_eq!(cells[0].language, Language::Python);
    }

    #[test]
    fn parent_inclusion_beyond_root_warns_but_emits() {
        let (cells, diagnostics) = transformed("nb1.py", "# MAGIC %run ../../shared/utils\n");
        assert_eq!(
            cells[0].pieces,
            vec![Piece::ImportAll {
                module: "shared.utils".to_string()
            }]
        );
        assert_eq!(diagnostics.count(), 1);
        assert_eq!(diagnostics.warnings[0].cell, Some(0));
    }

    #[test]
    fn parent_inclusion_within_root_does_not_warn() {
        let (_, diagnostics) = transformed("proj/nb1.py", "# MAGIC %run ../shared/utils\n");
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn malformed_inclusion_degrades_and_demotes() {
        let (cells, diagnostics) = transformed("proj/nb1.py", "# MAGIC %run ./\n");
        assert_eq!(cells[0].pieces, vec![Piece::Text("%run ./".to_string())]);
        assert_eq!(cells[0].demoted_lines, 1);
        assert_eq!(diagnostics.count(), 1);
    }

    #[test]
    fn query_block_coalesces_into_one_piece() {
        let (cells, _) = transformed(
            "nb1.py",
            "# MAGIC %sql\n# MAGIC SELECT 1\n# MAGIC SELECT 2\n",
        );
        assert_eq!(cells[0].language, Language::Sql);
        assert_eq!(
            cells[0].pieces,
            vec![Piece::Query {
                body: "SELECT 1\nSELECT 2".to_string()
            }]
        );
        assert_eq!(cells[0].line_count, 3);
    }

    #[test]
    fn embedded_query_inside_default_language_cell() {
        let (cells, _) = transformed(
            "nb1.py",
            "x = 1\n# MAGIC %sql SELECT * FROM t\ny = 2\n",
        );
        assert_eq!(cells[0].language, Language::Python);
        assert_eq!(
            cells[0].pieces,
            vec![
                Piece::Text("x = 1".to_string()),
                Piece::Query {
                    body: "SELECT * FROM t".to_string()
                },
                Piece::Text("y = 2".to_string()),
            ]
        );
    }

    #[test]
    fn language_switch_token_vanishes() {
        let (cells, _) = transformed("nb1.py", "# MAGIC %md\n# MAGIC # Heading\n# MAGIC body\n");
        assert_eq!(cells[0].language, Language::Markdown);
        assert_eq!(
            cells[0].pieces,
            vec![
                Piece::Text("# Heading".to_string()),
                Piece::Text("body".to_string()),
            ]
        );
    }

    #[test]
    fn markdown_same_line_payload_is_first_content_line() {
        let (cells, _) = transformed("nb1.py", "# MAGIC %md # Title\n");
        assert_eq!(cells[0].pieces, vec![Piece::Text("# Title".to_string())]);
    }

    #[test]
    fn unrecognized_directive_passes_through_marker_stripped() {
        let (cells, diagnostics) = transformed("nb1.py", "# MAGIC %fs ls /tmp\n");
        assert_eq!(cells[0].language, Language::Unknown);
        assert_eq!(cells[0].pieces, vec![Piece::Text("%fs ls /tmp".to_string())]);
        assert_eq!(cells[0].demoted_lines, 0);
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn install_call_becomes_hint_piece() {
        let (cells, _) = transformed(
            "nb1.py",
            "dbutils.library.installPyPI(\"seaborn\", version = \"0.9.0\")\n",
        );
        assert_eq!(
            cells[0].pieces,
            vec![Piece::InstallHint {
                package: "seaborn".to_string(),
                version: "0.9.0".to_string(),
            }]
        );
    }

    #[test]
    fn malformed_install_call_warns_and_passes_through() {
        let raw = "dbutils.library.installPyPI(fetch_name())";
        let (cells, diagnostics) = transformed("nb1.py", &format!("{raw}\n"));
        assert_eq!(cells[0].pieces, vec![Piece::Text(raw.to_string())]);
        assert_eq!(cells[0].demoted_lines, 0);
        assert_eq!(diagnostics.count(), 1);
    }

    #[test]
    fn titles_contribute_no_piece_but_count_as_lines() {
        let (cells, _) = transformed("nb1.py", "# DBTITLE 1,Load data\nx = 1\n");
        assert_eq!(cells[0].pieces, vec![Piece::Text("x = 1".to_string())]);
        assert_eq!(cells[0].line_count, 2);
    }

    #[test]
    fn empty_and_blank_cells_are_detectable() {
        let (cells, _) = transformed(
            "nb1.py",
            "x = 1\n# COMMAND ----------\n# COMMAND ----------\n\n# COMMAND ----------\ny = 2\n",
        );
        assert_eq!(cells.len(), 4);
        assert!(cells[1].is_empty());
        assert!(!cells[2].is_empty());
        assert!(cells[2].is_blank());
        assert!(!cells[3].is_blank());
    }

    #[test]
    fn cell_ordinals_follow_source_order() {
        let (cells, _) = transformed("nb1.py", "a = 1\n# COMMAND ----------\nb = 2\n");
        assert_eq!(cells[0].index, 0);
        assert_eq!(cells[1].index, 1);
    }
}
