//! Line-number gutter
//!
//! The gutter only needs the total line count and the active line; it
//! knows nothing about highlighting.

use unicode_width::UnicodeWidthStr;

use crate::document::Document;

/// Minimum number of digit columns
const MIN_DIGITS: usize = 3;

/// Line-number column for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gutter {
    total_lines: usize,
    active_line: usize,
}

impl Gutter {
    pub fn new(total_lines: usize, active_line: usize) -> Self {
        Self {
            total_lines,
            active_line,
        }
    }

    /// Snapshot the two queries the gutter needs from a document
    pub fn for_document(doc: &Document) -> Self {
        Self::new(doc.line_count(), doc.active_line())
    }

    /// Width of the column, including one separator space
    pub fn width(&self) -> usize {
        let digits = self.total_lines.max(1).to_string().width();
        digits.max(MIN_DIGITS) + 1
    }

    /// Right-aligned, one-based label for a line
    pub fn label(&self, line_idx: usize) -> String {
        format!("{:>width$} ", line_idx + 1, width = self.width() - 1)
    }

    /// Whether the line holds the cursor (drawn bold)
    pub fn is_active(&self, line_idx: usize) -> bool {
        line_idx == self.active_line
    }
}
