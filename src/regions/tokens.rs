//! Two-class token scanner for cursor tracking.
//!
//! A line is split into word runs (alphanumeric characters plus underscore,
//! matched greedily) and symbol runs (a single character that is neither
//! whitespace nor a word character). Whitespace belongs to no run.

use regex::Regex;
use std::sync::LazyLock;

use crate::document::LineIndex;

/// Character class of a token run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Word,
    Symbol,
}

/// A run of characters on one line, in UTF-16 columns. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRun {
    pub class: TokenClass,
    pub start: u32,
    pub end: u32,
}

impl TokenRun {
    /// Whether the cursor sits on one of the run's characters.
    pub fn covers(&self, column: u32) -> bool {
        self.start <= column && column < self.end
    }
}

/// Word runs, or a single symbol character.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<word>[\p{Alphabetic}\p{N}_]+)|(?P<symbol>[^\s\p{Alphabetic}\p{N}_])").unwrap()
});

/// Scan one line into word and symbol runs, left to right and non-overlapping.
pub fn scan_line(index: &LineIndex, line: u32) -> Vec<TokenRun> {
    let Some(line_start) = index.line_start(line) else {
        return Vec::new();
    };

    TOKEN_PATTERN
        .captures_iter(index.line_text(line))
        .filter_map(|caps| {
            let (class, m) = match (caps.name("word"), caps.name("symbol")) {
                (Some(m), _) => (TokenClass::Word, m),
                (None, Some(m)) => (TokenClass::Symbol, m),
                (None, None) => return None,
            };
            let range = index.span_to_range(&(line_start + m.start()..line_start + m.end()));
            Some(TokenRun {
                class,
                start: range.start.character,
                end: range.end.character,
            })
        })
        .collect()
}
