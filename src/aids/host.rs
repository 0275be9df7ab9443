use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Range;

use super::style::DecorationStyle;

/// Opaque token for a decoration style created on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecorationHandle(pub u64);

/// Host editor operations for rendering decorations.
pub trait DecorationHost {
    /// Register a style and return the handle spans are applied through.
    fn create_decoration(&mut self, style: &DecorationStyle) -> DecorationHandle;

    /// Replace the span set previously applied for `handle`.
    /// An empty vector clears the decoration.
    fn apply_decoration(&mut self, handle: DecorationHandle, spans: Vec<Range>);

    /// Release a handle. Its spans disappear with it.
    fn dispose_decoration(&mut self, handle: DecorationHandle);
}
