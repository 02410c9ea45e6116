//! Per-document line counters.
//!
//! Every emitter charges each cell's full line span to exactly one bucket,
//! so for any valid document the four counters sum to the input line count
//! minus the header and separator lines. Lines degraded to passthrough
//! content are re-charged from their cell's bucket to `other_lines`.

use serde::Serialize;

use crate::transform::Cell;

/// Line counters for one (document, target) conversion.
///
/// Field names match the inventory report columns: `comment_lines` counts
/// documentation cells, `sql_lines` counts embedded-query cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Lines in cells rendered as target-language code.
    pub code_lines: usize,
    /// Lines in documentation cells.
    pub comment_lines: usize,
    /// Lines in embedded-query cells.
    pub sql_lines: usize,
    /// Lines in cells the target dropped, plus degraded passthrough lines.
    pub other_lines: usize,
}

impl Inventory {
    /// Charges a cell to the code bucket.
    pub fn count_code(&mut self, cell: &Cell) {
        self.code_lines += cell.line_count - cell.demoted_lines;
        self.other_lines += cell.demoted_lines;
    }

    /// Charges a cell to the documentation bucket.
    pub fn count_documentation(&mut self, cell: &Cell) {
        self.comment_lines += cell.line_count - cell.demoted_lines;
        self.other_lines += cell.demoted_lines;
    }

    /// Charges a cell to the query bucket.
    pub fn count_query(&mut self, cell: &Cell) {
        self.sql_lines += cell.line_count - cell.demoted_lines;
        self.other_lines += cell.demoted_lines;
    }

    /// Charges a whole cell to the other/dropped bucket.
    pub fn count_other(&mut self, cell: &Cell) {
        self.other_lines += cell.line_count;
    }

    /// Sum of all four buckets.
    pub fn total(&self) -> usize {
        self.code_lines + self.comment_lines + self.sql_lines + self.other_lines
    }

    /// Adds another inventory's counters into this one.
    pub fn merge(&mut self, other: &Inventory) {
        self.code_lines += other.code_lines;
        self.comment_lines += other.comment_lines;
        self.sql_lines += other.sql_lines;
        self.other_lines += other.other_lines;
    }
}
