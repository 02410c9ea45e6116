//! Flat-script emission.
//!
//! Keeps cells of the target language, query cells, and documentation cells;
//! everything else is dropped and charged to the "other" bucket. Chunks are
//! concatenated with a single blank-line separator, and the first
//! target-language cell is preceded by a one-time session prologue.

use nbx_core::Language;

use crate::Options;
use crate::emit::{QueryStyle, cell_text, comment_block, trim_blank_edges};
use crate::inventory::Inventory;
use crate::transform::{Cell, query};

/// Emits the flat-script text for one host language.
///
/// Rendering is two passes: every kept cell becomes a chunk (cells that
/// render to nothing, like empty cells, are skipped), then the prologue is
/// inserted before the first target-language chunk found by scanning the
/// rendered sequence. Documents without such a chunk get no prologue.
pub fn emit(cells: &[Cell], language: Language, options: &Options) -> (String, Inventory) {
    let mut inventory = Inventory::default();
    let query_style = QueryStyle::Execute {
        extract: options.extract_sql,
        omit_prefix: language.comment_prefix(),
    };

    let mut rendered: Vec<(bool, String)> = Vec::new();
    for cell in cells {
        if cell.language == language {
            inventory.count_code(cell);
            let chunk = trim_blank_edges(&cell_text(cell, query_style));
            if !chunk.is_empty() {
                rendered.push((true, chunk));
            }
        } else if cell.language == Language::Sql {
            inventory.count_query(cell);
            // The whole cell text is one query, whether it came from a
            // query directive or from a sql-default document.
            let body = trim_blank_edges(&cell_text(cell, QueryStyle::Raw));
            if !body.is_empty() {
                let chunk = if options.extract_sql {
                    query::render_execution(&body)
                } else {
                    format!("{} SQL CELL OMITTED", language.comment_prefix())
                };
                rendered.push((false, chunk));
            }
        } else if cell.language == Language::Markdown {
            inventory.count_documentation(cell);
            let text = trim_blank_edges(&cell_text(cell, QueryStyle::Raw));
            let chunk = comment_block(&text, language.comment_prefix());
            if !chunk.is_empty() {
                rendered.push((false, chunk));
            }
        } else {
            inventory.count_other(cell);
        }
    }

    let first_code = rendered.iter().position(|(is_code, _)| *is_code);
    let mut chunks: Vec<String> = Vec::with_capacity(rendered.len() + 1);
    for (at, (_, chunk)) in rendered.into_iter().enumerate() {
        if Some(at) == first_code {
            chunks.push(prologue(language, &options.app_name));
        }
        chunks.push(chunk);
    }

    if chunks.is_empty() {
        (String::new(), inventory)
    } else {
        (format!("{}\n", chunks.join("\n\n")), inventory)
    }
}

fn prologue(language: Language, app_name: &str) -> String {
    match language {
        Language::Scala => format!(
            "// Default imports\n\
             import org.apache.spark.sql.SparkSession\n\
             import org.apache.spark.sql.functions._\n\
             import org.apache.spark.sql._\n\
             val spark = SparkSession.builder.appName(\"{app_name}\").getOrCreate()"
        ),
        _ => format!(
            "# Default imports\n\
             from pyspark.sql import SparkSession\n\
             from pyspark.sql.functions import *\n\
             spark = SparkSession.builder.appName(\"{app_name}\").getOrCreate()"
        ),
    }
}
