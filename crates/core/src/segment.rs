//! Cell segmentation over the classified line stream.
//!
//! Only separator lines create cell boundaries. Blank lines are ordinary
//! content and round-trip through cells untouched.

use crate::classify::{ClassifiedLine, LineKind};

/// An unresolved cell: the classified lines between two separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// Classified lines in source order.
    pub lines: Vec<ClassifiedLine>,
}

impl RawCell {
    /// Number of raw input lines in this cell.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the cell has no lines (two consecutive separators).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when the cell consists solely of directive-family lines
    /// (blank content lines are tolerated).
    pub fn is_directive_only(&self) -> bool {
        !self.is_empty()
            && self.lines.iter().all(|line| {
                line.kind.is_directive_family()
                    || (matches!(line.kind, LineKind::Content) && line.is_blank())
            })
    }
}

/// Groups classified lines into ordered cells at separator lines.
///
/// A separator always closes the current cell, so two consecutive separators
/// produce one empty cell. End of input closes the last cell only when it
/// holds at least one line; a trailing separator adds no phantom cell.
/// Header lines are structural and never become cell content.
pub fn segment_cells(lines: Vec<ClassifiedLine>) -> Vec<RawCell> {
    let mut cells = Vec::new();
    let mut current = RawCell::default();
    for line in lines {
        match line.kind {
            LineKind::Header => {}
            LineKind::Separator => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.lines.push(line),
        }
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
