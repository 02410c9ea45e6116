//! Embedded-query block coalescing.
//!
//! An opening query directive swallows every continuation line immediately
//! after it. The block ends at the first non-continuation line or at the end
//! of the cell; end of input always closes an open block.

use nbx_core::{ClassifiedLine, LineKind};

/// Coalesces the continuation block following an opening query directive.
///
/// `arg` is the opening directive's same-line argument (the first body line
/// when non-blank); `rest` are the classified lines after the directive.
/// Returns the joined query body (outer whitespace trimmed, interior line
/// order and spacing preserved) and the number of lines consumed from
/// `rest`.
pub fn coalesce_block(arg: &str, rest: &[ClassifiedLine]) -> (String, usize) {
    let mut body: Vec<&str> = Vec::new();
    if !arg.trim().is_empty() {
        body.push(arg);
    }
    let mut consumed = 0;
    for line in rest {
        match &line.kind {
            LineKind::Continuation { text } => {
                body.push(text);
                consumed += 1;
            }
            _ => break,
        }
    }
    (body.join("\n").trim().to_string(), consumed)
}

/// Renders the execution-and-display form wrapping a query body.
pub fn render_execution(body: &str) -> String {
    format!("spark.sql(\"\"\"{body}\"\"\").show()")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbx_core::{Dialect, classify_lines};

    fn classified(lines: &[&str]) -> Vec<ClassifiedLine> {
        classify_lines(lines.iter().copied(), Dialect::Python)
    }

    #[test]
    fn coalesces_continuation_lines_in_order() {
        let rest = classified(&["# MAGIC SELECT 1", "# MAGIC SELECT 2"]);
        let (body, consumed) = coalesce_block("", &rest);
        assert_eq!(body, "SELECT 1\nSELECT 2");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn same_line_argument_starts_the_body() {
        let rest = classified(&["# MAGIC FROM t"]);
        let (body, consumed) = coalesce_block("SELECT *", &rest);
        assert_eq!(body, "SELECT *\nFROM t");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn block_stops_at_first_non_continuation_line() {
        let rest = classified(&["# MAGIC SELECT 1", "print(1)", "# MAGIC SELECT 2"]);
        let (body, consumed) = coalesce_block("", &rest);
        assert_eq!(body, "SELECT 1");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn end_of_cell_closes_the_block() {
        let rest = classified(&["# MAGIC SELECT 1"]);
        let (body, consumed) = coalesce_block("", &rest);
        assert_eq!(body, "SELECT 1");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn interior_blank_continuations_survive_outer_trim() {
        let rest = classified(&["# MAGIC", "# MAGIC SELECT 1", "# MAGIC", "# MAGIC SELECT 2", "# MAGIC"]);
        let (body, consumed) = coalesce_block("", &rest);
        assert_eq!(body, "SELECT 1\n\nSELECT 2");
        assert_eq!(consumed, 5);
    }

    #[test]
    fn empty_block_yields_empty_body() {
        let (body, consumed) = coalesce_block("", &[]);
        assert_eq!(body, "");
        assert_eq!(consumed, 0);
    }

    #[test]
    fn execution_form_embeds_the_body_verbatim() {
        assert_eq!(
            render_execution("SELECT 1\nSELECT 2"),
            "spark.sql(\"\"\"SELECT 1\nSELECT 2\"\"\").show()"
        );
    }
}
