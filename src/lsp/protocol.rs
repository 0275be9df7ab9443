//! Custom LSP messages exchanged with the client extension.
//!
//! The client reports cursor moves and editor focus changes; the server answers
//! with ordered batches of decoration operations for the client to render.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{Position, Range, TextDocumentIdentifier, Url};

use crate::aids::{DecorationHandle, DecorationHost, DecorationStyle};

/// Client -> server: the primary selection of an editor moved.
pub enum DidChangeSelection {}

impl Notification for DidChangeSelection {
    type Params = SelectionParams;
    const METHOD: &'static str = "readingAids/didChangeSelection";
}

/// Client -> server: a different editor gained focus.
pub enum DidChangeActiveEditor {}

impl Notification for DidChangeActiveEditor {
    type Params = SelectionParams;
    const METHOD: &'static str = "readingAids/didChangeActiveEditor";
}

/// Server -> client: decoration operations for one editor.
pub enum Decorate {}

impl Notification for Decorate {
    type Params = DecorateParams;
    const METHOD: &'static str = "readingAids/decorate";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionParams {
    pub text_document: TextDocumentIdentifier,
    /// The primary selection; empty when the cursor is collapsed.
    pub selection: Range,
    /// Where the cursor sits (the moving end of the selection).
    pub active: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorateParams {
    pub uri: Url,
    /// Arrival number of the event that produced this batch.
    pub sequence: u64,
    /// Operations to run in order.
    pub operations: Vec<DecorationOp>,
}

/// One decoration operation, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecorationOp {
    Create {
        handle: DecorationHandle,
        style: DecorationStyle,
    },
    Apply {
        handle: DecorationHandle,
        ranges: Vec<Range>,
    },
    Dispose {
        handle: DecorationHandle,
    },
}

/// Collects the operations a session performs while handling one event.
///
/// Handle ids come from a counter shared by every editor so they stay unique
/// on the client.
#[derive(Debug)]
pub struct DecorationBatch<'a> {
    next_handle: &'a mut u64,
    operations: Vec<DecorationOp>,
}

impl<'a> DecorationBatch<'a> {
    pub fn new(next_handle: &'a mut u64) -> Self {
        Self {
            next_handle,
            operations: Vec::new(),
        }
    }

    #[cfg(test)]
    fn operations(&self) -> &[DecorationOp] {
        &self.operations
    }

    /// Finish the batch. Returns None when nothing was recorded.
    pub fn into_params(self, uri: Url, sequence: u64) -> Option<DecorateParams> {
        if self.operations.is_empty() {
            return None;
        }
        Some(DecorateParams {
            uri,
            sequence,
            operations: self.operations,
        })
    }
}

impl DecorationHost for DecorationBatch<'_> {
    fn create_decoration(&mut self, style: &DecorationStyle) -> DecorationHandle {
        let handle = DecorationHandle(*self.next_handle);
        *self.next_handle += 1;
        self.operations.push(DecorationOp::Create {
            handle,
            style: style.clone(),
        });
        handle
    }

    fn apply_decoration(&mut self, handle: DecorationHandle, spans: Vec<Range>) {
        self.operations.push(DecorationOp::Apply {
            handle,
            ranges: spans,
        });
    }

    fn dispose_decoration(&mut self, handle: DecorationHandle) {
        self.operations.push(DecorationOp::Dispose { handle });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aids::masking_style;

    #[test]
    fn batch_allocates_unique_handles() {
        let mut next = 7;
        let mut batch = DecorationBatch::new(&mut next);
        let a = batch.create_decoration(&masking_style());
        let b = batch.create_decoration(&masking_style());
        batch.dispose_decoration(a);
        assert_eq!((a, b), (DecorationHandle(7), DecorationHandle(8)));
        assert_eq!(batch.operations().len(), 3);
        drop(batch);
        assert_eq!(next, 9);
    }

    #[test]
    fn empty_batch_produces_no_notification() {
        let mut next = 0;
        let batch = DecorationBatch::new(&mut next);
        let uri = Url::parse("file:///tmp/a.txt").unwrap();
        assert!(batch.into_params(uri, 1).is_none());
    }

    #[test]
    fn operations_are_tagged_by_kind() {
        let op = DecorationOp::Apply {
            handle: DecorationHandle(3),
            ranges: vec![Range::new(Position::new(0, 1), Position::new(0, 2))],
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            serde_json::json!({
                "kind": "apply",
                "handle": 3,
                "ranges": [{
                    "start": { "line": 0, "character": 1 },
                    "end": { "line": 0, "character": 2 }
                }]
            })
        );
    }

    #[test]
    fn selection_params_use_camel_case() {
        let params: SelectionParams = serde_json::from_value(serde_json::json!({
            "textDocument": { "uri": "file:///tmp/a.txt" },
            "selection": {
                "start": { "line": 1, "character": 0 },
                "end": { "line": 1, "character": 0 }
            },
            "active": { "line": 1, "character": 0 }
        }))
        .unwrap();
        assert_eq!(params.active, Position::new(1, 0));
    }
}
