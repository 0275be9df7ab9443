use tower_lsp::lsp_types::Range;

use crate::document::LineIndex;

/// One whole-line span per line, for tinting the entire document.
pub fn select_overlay_regions(index: &LineIndex) -> Vec<Range> {
    (0..index.line_count())
        .map(|line| index.line_range(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use tower_lsp::lsp_types::Position;

    use super::*;

    #[test]
    fn covers_every_line() {
        let idx = LineIndex::new("ab\n\ncde".to_string());
        assert_eq!(
            select_overlay_regions(&idx),
            vec![
                Range::new(Position::new(0, 0), Position::new(0, 2)),
                Range::new(Position::new(1, 0), Position::new(1, 0)),
                Range::new(Position::new(2, 0), Position::new(2, 3)),
            ]
        );
    }
}
