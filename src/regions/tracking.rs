//! Cursor word tracking.
//!
//! Highlights the token touching the cursor and fades the rest of the document.
//! Token choice, in order:
//! 1. a word run with a character under the cursor
//! 2. a symbol run starting at the cursor
//! 3. a word run ending at the cursor (touching its trailing edge)
//! 4. the single character after the cursor
//!
//! The last step always applies, so a highlight is always produced.

use tower_lsp::lsp_types::{Position, Range};

use super::tokens::{scan_line, TokenClass, TokenRun};
use crate::document::LineIndex;

/// Emphasized span plus the spans faded around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRegion {
    pub highlight: Range,
    pub fades: Vec<Range>,
}

/// Compute the tracked region for a collapsed cursor.
pub fn select_tracked_region(index: &LineIndex, cursor: Position) -> TrackedRegion {
    let highlight = highlight_at(index, cursor);
    TrackedRegion {
        fades: fade_spans(index, highlight),
        highlight,
    }
}

/// Compute the tracked region for an editor selection.
///
/// A non-empty selection is highlighted as-is; an empty one falls back to the
/// token rules at the active position.
pub fn select_tracked_selection(
    index: &LineIndex,
    selection: Range,
    active: Position,
) -> TrackedRegion {
    if selection.start == selection.end {
        return select_tracked_region(index, active);
    }
    let (start, end) = if selection.start <= selection.end {
        (selection.start, selection.end)
    } else {
        (selection.end, selection.start)
    };
    let highlight = Range::new(start, end);
    TrackedRegion {
        fades: fade_spans(index, highlight),
        highlight,
    }
}

/// The span to emphasize for a cursor position.
pub fn highlight_at(index: &LineIndex, cursor: Position) -> Range {
    debug_assert!(cursor.line < index.line_count(), "cursor line out of range");
    let runs = scan_line(index, cursor.line);
    let column = cursor.character;

    let chosen = find_run(&runs, |r| r.class == TokenClass::Word && r.covers(column))
        .or_else(|| find_run(&runs, |r| r.class == TokenClass::Symbol && r.start == column))
        .or_else(|| find_run(&runs, |r| r.class == TokenClass::Word && r.end == column));

    match chosen {
        Some(run) => Range::new(
            Position::new(cursor.line, run.start),
            Position::new(cursor.line, run.end),
        ),
        None => {
            let width = next_char_width(index.line_text(cursor.line), column);
            Range::new(cursor, Position::new(cursor.line, column + width))
        }
    }
}

fn find_run(runs: &[TokenRun], pred: impl Fn(&TokenRun) -> bool) -> Option<TokenRun> {
    runs.iter().copied().find(|r| pred(r))
}

/// UTF-16 width of the character starting at `column`, or 1 past the end of the line.
fn next_char_width(text: &str, column: u32) -> u32 {
    let mut col = 0u32;
    for c in text.chars() {
        if col >= column {
            return c.len_utf16() as u32;
        }
        col += c.len_utf16() as u32;
    }
    1
}

/// Every part of the document outside `highlight`.
///
/// Yields at most four spans in document order: the lines above the highlight,
/// the start of the highlight's first line, the rest of its last line, and the
/// lines below. Empty spans are omitted; neighbouring spans are not merged.
pub fn fade_spans(index: &LineIndex, highlight: Range) -> Vec<Range> {
    let mut fades = Vec::with_capacity(4);
    let first = highlight.start.line;
    let last = highlight.end.line;

    if first > 0 {
        fades.push(Range::new(Position::new(0, 0), Position::new(first, 0)));
    }
    if highlight.start.character > 0 {
        fades.push(Range::new(Position::new(first, 0), highlight.start));
    }
    let last_len = index.line_len(last);
    if highlight.end.character < last_len {
        fades.push(Range::new(highlight.end, Position::new(last, last_len)));
    }
    if last + 1 < index.line_count() {
        let below = Range::new(Position::new(last + 1, 0), index.end_position());
        // Only a lone empty final line (trailing newline) makes this zero-width.
        if below.start != below.end {
            fades.push(below);
        }
    }
    fades
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
        Range::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    fn highlight(text: &str, column: u32) -> Range {
        let idx = LineIndex::new(text.to_string());
        highlight_at(&idx, Position::new(0, column))
    }

    #[test]
    fn fades_keep_above_and_prefix_apart() {
        let idx = LineIndex::new("hello world!\nsecond line".to_string());
        let region = select_tracked_region(&idx, Position::new(1, 7));
        assert_eq!(region.highlight, span(1, 7, 1, 11));
        assert_eq!(region.fades, vec![span(0, 0, 1, 0), span(1, 0, 1, 7)]);
    }

    #[test]
    fn cursor_inside_word() {
        let idx = LineIndex::new("hello world!".to_string());
        let region = select_tracked_region(&idx, Position::new(0, 2));
        assert_eq!(region.highlight, span(0, 0, 0, 5));
        assert_eq!(region.fades, vec![span(0, 5, 0, 12)]);
    }

    #[test]
    fn cursor_on_symbol_after_word() {
        assert_eq!(highlight("a, b", 1), span(0, 1, 0, 2));
    }

    #[test]
    fn trailing_word_edge_beats_fallback() {
        assert_eq!(highlight("cat dog", 3), span(0, 0, 0, 3));
    }

    #[test]
    fn leading_word_edge() {
        assert_eq!(highlight("cat dog", 4), span(0, 4, 0, 7));
    }

    #[test]
    fn whitespace_falls_back_to_next_character() {
        assert_eq!(highlight("a  b", 2), span(0, 2, 0, 3));
    }

    #[test]
    fn end_of_line_after_symbol_falls_back() {
        assert_eq!(highlight("end;", 4), span(0, 4, 0, 5));
    }

    #[test]
    fn empty_line_still_highlights() {
        let idx = LineIndex::new("x\n\ny".to_string());
        let region = select_tracked_region(&idx, Position::new(1, 0));
        assert_eq!(region.highlight, span(1, 0, 1, 1));
        assert_eq!(region.fades, vec![span(0, 0, 1, 0), span(2, 0, 2, 1)]);
    }

    #[test]
    fn fallback_spans_surrogate_pair() {
        assert_eq!(highlight(" \u{1F600}", 0), span(0, 0, 0, 1));
        // U+1F600 is a symbol run of width 2.
        assert_eq!(highlight(" \u{1F600}", 1), span(0, 1, 0, 3));
    }

    #[test]
    fn fades_surround_highlight_in_middle_line() {
        let idx = LineIndex::new("one\ntwo three four\nfive".to_string());
        let region = select_tracked_region(&idx, Position::new(1, 6));
        assert_eq!(region.highlight, span(1, 4, 1, 9));
        assert_eq!(
            region.fades,
            vec![
                span(0, 0, 1, 0),
                span(1, 0, 1, 4),
                span(1, 9, 1, 14),
                span(2, 0, 2, 4),
            ]
        );
    }

    #[test]
    fn trailing_newline_adds_no_empty_fade() {
        let idx = LineIndex::new("word\n".to_string());
        let region = select_tracked_region(&idx, Position::new(0, 0));
        assert_eq!(region.highlight, span(0, 0, 0, 4));
        assert!(region.fades.is_empty());
    }

    #[test]
    fn non_empty_selection_is_highlighted_verbatim() {
        let idx = LineIndex::new("alpha\nbeta\ngamma".to_string());
        let region = select_tracked_selection(&idx, span(1, 2, 0, 3), Position::new(0, 3));
        assert_eq!(region.highlight, span(0, 3, 1, 2));
        assert_eq!(
            region.fades,
            vec![span(0, 0, 0, 3), span(1, 2, 1, 4), span(2, 0, 2, 5)]
        );
    }

    #[test]
    fn empty_selection_uses_token_rules() {
        let idx = LineIndex::new("alpha beta".to_string());
        let region = select_tracked_selection(&idx, span(0, 7, 0, 7), Position::new(0, 7));
        assert_eq!(region.highlight, span(0, 6, 0, 10));
    }
}
