//! Query-only emission.
//!
//! Keeps only embedded-query cells, wrapper stripped, so the output is pure
//! query text; documentation cells render as query-language comments. Every
//! other cell leaves no trace in the output and is charged to "other".

use nbx_core::Language;

use crate::emit::{QueryStyle, cell_text, comment_block, trim_blank_edges};
use crate::inventory::Inventory;
use crate::transform::Cell;

/// Emits the query-only text.
pub fn emit(cells: &[Cell]) -> (String, Inventory) {
    let mut inventory = Inventory::default();
    let mut chunks: Vec<String> = Vec::new();
    for cell in cells {
        match cell.language {
            Language::Sql => {
                inventory.count_query(cell);
                let chunk = trim_blank_edges(&cell_text(cell, QueryStyle::Raw));
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }
            }
            Language::Markdown => {
                inventory.count_documentation(cell);
                let text = trim_blank_edges(&cell_text(cell, QueryStyle::Raw));
                let chunk = comment_block(&text, Language::Sql.comment_prefix());
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }
            }
            _ => inventory.count_other(cell),
        }
    }

    if chunks.is_empty() {
        (String::new(), inventory)
    } else {
        (format!("{}\n", chunks.join("\n\n")), inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Piece;

    fn cell(index: usize, language: Language, pieces: Vec<Piece>, line_count: usize) -> Cell {
        Cell {
            index,
            language,
            pieces,
            line_count,
            demoted_lines: 0,
        }
    }

    fn query(body: &str) -> Piece {
        Piece::Query {
            body: body.to_string(),
        }
    }

    #[test]
    fn only_query_text_survives() {
        let cells = vec![
            cell(0, Language::Python, vec![Piece::Text("a = 1".to_string())], 1),
            cell(1, Language::Sql, vec![query("SELECT 1\nSELECT 2")], 3),
            cell(2, Language::Sql, vec![query("SELECT 3")], 2),
        ];
        let (text, inventory) = emit(&cells);
        assert_eq!(text, "SELECT 1\nSELECT 2\n\nSELECT 3\n");
        assert_eq!(inventory.sql_lines, 5);
        assert_eq!(inventory.other_lines, 1);
        assert_eq!(inventory.code_lines, 0);
    }

    #[test]
    fn documentation_renders_as_query_comments() {
        let cells = vec![
            cell(
                0,
                Language::Markdown,
                vec![Piece::Text("# Report".to_string())],
                2,
            ),
            cell(1, Language::Sql, vec![query("SELECT 1")], 2),
        ];
        let (text, inventory) = emit(&cells);
        assert_eq!(text, "-- # Report\n\nSELECT 1\n");
        assert_eq!(inventory.comment_lines, 2);
    }

    #[test]
    fn dropped_cells_leave_no_trace() {
        let cells = vec![
            cell(0, Language::Scala, vec![Piece::Text("val x = 1".to_string())], 1),
            cell(1, Language::Unknown, vec![Piece::Text("%fs ls".to_string())], 1),
        ];
        let (text, inventory) = emit(&cells);
        assert_eq!(text, "");
        assert_eq!(inventory.other_lines, 2);
        assert_eq!(inventory.total(), 2);
    }

    #[test]
    fn empty_query_cells_are_counted_but_invisible() {
        let cells = vec![
            cell(0, Language::Sql, vec![query("SELECT 1")], 2),
            cell(1, Language::Sql, Vec::new(), 0),
        ];
        let (text, _) = emit(&cells);
        assert_eq!(text, "SELECT 1\n");
    }
}
