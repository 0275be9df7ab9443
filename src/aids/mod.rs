//! Reading aid modes and their per-editor state.
//!
//! This module provides:
//! - `AidMode` and the selection listener registry each mode subscribes through
//! - Decoration styles and color palettes
//! - `DecorationHost`, the collaborator that renders decorations
//! - `AidSession`, the per-editor state machine driving the region selectors

mod host;
mod mode;
mod session;
mod style;

pub use host::{DecorationHandle, DecorationHost};
pub use mode::{AidMode, SelectionListeners, Subscription};
pub use session::{AidSession, SelectionOutcome};
pub use style::{
    masking_style, AidPreferences, DecorationStyle, LineFocusColor, OverlayColor, TrackingColor,
};
