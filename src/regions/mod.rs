//! Highlight region selection.
//!
//! Pure functions that decide which spans of a document to emphasize and which
//! to de-emphasize for each reading aid. Every selector reads a `LineIndex`
//! snapshot and a cursor position and is recomputed from scratch on each change:
//! - Line focus: the active line
//! - Text masking: every line except the active one
//! - Cursor tracking: the token under the cursor, with everything else faded
//! - Color overlay: every line

mod line_focus;
mod masking;
mod overlay;
mod tokens;
mod tracking;

pub use line_focus::select_line_focus;
pub use masking::select_masked_regions;
pub use overlay::select_overlay_regions;
pub use tokens::{scan_line, TokenClass, TokenRun};
pub use tracking::{
    fade_spans, highlight_at, select_tracked_region, select_tracked_selection, TrackedRegion,
};
