use tower_lsp::lsp_types::{Position, Range};

use crate::document::LineIndex;

/// The full span of the line holding the cursor.
///
/// An empty line yields a zero-width span at column 0.
pub fn select_line_focus(index: &LineIndex, cursor: Position) -> Range {
    debug_assert!(cursor.line < index.line_count(), "cursor line out of range");
    index.line_range(cursor.line)
}
