//! Document state management and text utilities.
//!
//! This module provides:
//! - `LineIndex`, the document snapshot, with byte offset <-> LSP position conversion
//! - `DocumentState` and `DocumentStore` for document lifecycle management

mod state;
mod text;

pub use state::{DocumentState, DocumentStore};
pub use text::LineIndex;
