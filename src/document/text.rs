//! Text utilities for position conversion.
//!
//! Provides efficient byte offset -> LSP position conversion with proper UTF-16 handling,
//! plus the per-line lookups the region selectors work on.

use tower_lsp::lsp_types::{Position, Range};

use crate::error::{AidError, Result};

/// Pre-computed line index for efficient position lookups.
///
/// This is the immutable document snapshot every region computation reads from.
/// LSP positions use line/column where column is in UTF-16 code units.
/// This struct pre-computes line start offsets for O(log n) lookup.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    /// Source text (needed for UTF-16 column calculation).
    source: String,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];

        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            line_starts,
            source,
        }
    }

    /// Number of lines. An empty document still has one (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Byte bounds of a line's text, excluding the line terminator.
    fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let mut end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        if end > start && self.source.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }

    /// Byte offset where a line starts, if the line exists.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// Text of a line without its terminator. Out-of-range lines read as empty.
    pub fn line_text(&self, line: u32) -> &str {
        match self.line_bounds(line as usize) {
            Some((start, end)) => &self.source[start..end],
            None => "",
        }
    }

    /// Length of a line in UTF-16 code units.
    pub fn line_len(&self, line: u32) -> u32 {
        self.line_text(line).encode_utf16().count() as u32
    }

    /// The whole-line span of `line`, from column 0 to the end of its text.
    pub fn line_range(&self, line: u32) -> Range {
        Range::new(Position::new(line, 0), Position::new(line, self.line_len(line)))
    }

    /// Position just past the last character of the document.
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line_len(last))
    }

    /// Reject positions whose line lies outside the document.
    pub fn check_position(&self, position: Position) -> Result<()> {
        if position.line < self.line_count() {
            Ok(())
        } else {
            Err(AidError::InvalidPosition {
                line: position.line,
                line_count: self.line_count(),
            })
        }
    }

    /// Clamp a position into the document: past-the-end lines map to the last
    /// line and columns are limited to the line's length.
    pub fn clamp_position(&self, position: Position) -> Position {
        let line = position.line.min(self.line_count() - 1);
        Position::new(line, position.character.min(self.line_len(line)))
    }

    /// Convert a byte offset to an LSP position.
    ///
    /// Uses binary search for O(log n) line lookup, then scans the line for UTF-16 column.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        // Binary search to find the line
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,                    // Exact match (start of line)
            Err(line) => line.saturating_sub(1), // In the middle of a line
        };

        let line_start = self.line_starts[line];
        let line_end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.source.len());

        // Calculate UTF-16 column
        let mut col = 0u32;
        let line_slice = &self.source[line_start..line_end];

        for (i, c) in line_slice.char_indices() {
            if line_start + i >= offset {
                break;
            }
            col += c.len_utf16() as u32;
        }

        Position::new(line as u32, col)
    }

    /// Convert a byte span to an LSP range.
    pub fn span_to_range(&self, span: &std::ops::Range<usize>) -> Range {
        let start = self.offset_to_position(span.start);
        let end = self.offset_to_position(span.end);
        Range::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let idx = LineIndex::new("hello world".to_string());
        assert_eq!(idx.offset_to_position(0), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(5), Position::new(0, 5));
        assert_eq!(idx.offset_to_position(11), Position::new(0, 11));
    }

    #[test]
    fn multi_line() {
        let idx = LineIndex::new("hello\nworld\ntest".to_string());
        assert_eq!(idx.offset_to_position(0), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(6), Position::new(1, 0)); // 'w'
        assert_eq!(idx.offset_to_position(12), Position::new(2, 0)); // 't'
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.line_text(1), "world");
    }

    #[test]
    fn utf16_handling() {
        // U+1F600 is 4 bytes in UTF-8 but 2 code units in UTF-16
        let idx = LineIndex::new("a\u{1F600}b".to_string());
        assert_eq!(idx.offset_to_position(1), Position::new(0, 1));
        assert_eq!(idx.offset_to_position(5), Position::new(0, 3));
        assert_eq!(idx.line_len(0), 4);
    }

    #[test]
    fn crlf_lines_exclude_carriage_return() {
        let idx = LineIndex::new("ab\r\ncd\r\n".to_string());
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.line_text(0), "ab");
        assert_eq!(idx.line_len(1), 2);
        assert_eq!(idx.line_text(2), "");
    }

    #[test]
    fn line_range_and_end_position() {
        let idx = LineIndex::new("one\n\nthree".to_string());
        assert_eq!(
            idx.line_range(0),
            Range::new(Position::new(0, 0), Position::new(0, 3))
        );
        assert_eq!(
            idx.line_range(1),
            Range::new(Position::new(1, 0), Position::new(1, 0))
        );
        assert_eq!(idx.end_position(), Position::new(2, 5));
    }

    #[test]
    fn empty_document_has_one_line() {
        let idx = LineIndex::new(String::new());
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_text(0), "");
        assert_eq!(idx.end_position(), Position::new(0, 0));
    }

    #[test]
    fn check_and_clamp_position() {
        let idx = LineIndex::new("hello\nhi".to_string());
        assert!(idx.check_position(Position::new(1, 0)).is_ok());
        assert_eq!(
            idx.check_position(Position::new(2, 0)),
            Err(AidError::InvalidPosition {
                line: 2,
                line_count: 2
            })
        );
        assert_eq!(idx.clamp_position(Position::new(9, 9)), Position::new(1, 2));
        assert_eq!(idx.clamp_position(Position::new(0, 3)), Position::new(0, 3));
    }

    #[test]
    fn span_to_range() {
        let idx = LineIndex::new("hello\nworld".to_string());
        let range = idx.span_to_range(&(6..11));
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 5));
    }
}
