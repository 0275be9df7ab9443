use tower_lsp::lsp_types::Range;

use crate::document::LineIndex;

/// Whole-line spans for every line except `active_line`, ascending by line.
///
/// Together with the active line's span these cover the document exactly once.
pub fn select_masked_regions(index: &LineIndex, active_line: u32) -> Vec<Range> {
    debug_assert!(active_line < index.line_count(), "active line out of range");
    (0..index.line_count())
        .filter(|&line| line != active_line)
        .map(|line| index.line_range(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use tower_lsp::lsp_types::Position;

    use super::*;

    #[test]
    fn masks_all_but_active_line() {
        let idx = LineIndex::new("zero\none\ntwo".to_string());
        let spans = select_masked_regions(&idx, 1);
        assert_eq!(
            spans,
            vec![
                Range::new(Position::new(0, 0), Position::new(0, 4)),
                Range::new(Position::new(2, 0), Position::new(2, 3)),
            ]
        );
    }

    #[test]
    fn single_line_document_masks_nothing() {
        let idx = LineIndex::new("only".to_string());
        assert!(select_masked_regions(&idx, 0).is_empty());
    }

    #[test]
    fn masked_lines_plus_active_line_cover_document() {
        let idx = LineIndex::new("a\nbb\n\ncccc\n".to_string());
        for active in 0..idx.line_count() {
            let spans = select_masked_regions(&idx, active);
            assert_eq!(spans.len() as u32 + 1, idx.line_count());
            assert!(spans.iter().all(|s| s.start.line != active));
            let covered: u32 = spans.iter().map(|s| s.end.character - s.start.character).sum();
            let total: u32 = (0..idx.line_count()).map(|l| idx.line_len(l)).sum();
            assert_eq!(covered + idx.line_len(active), total);
        }
    }
}
