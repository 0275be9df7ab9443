//! Document state management for the reading aids server.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::text::LineIndex;

/// State for a single open document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Pre-computed line index; the snapshot every region computation reads.
    pub line_index: LineIndex,
    /// Document version from the client.
    pub version: i32,
}

impl DocumentState {
    /// Create a new document state from the full source text.
    pub fn new(source: String, version: i32) -> Self {
        Self {
            line_index: LineIndex::new(source),
            version,
        }
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<DocumentState>>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open or replace a document with the given source text.
    ///
    /// Returns None, leaving the stored snapshot in place, when `version` is
    /// older than the one already stored.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Option<Arc<DocumentState>> {
        let state = Arc::new(DocumentState::new(source, version));
        match self.documents.entry(uri) {
            Entry::Occupied(entry) if entry.get().version > version => return None,
            Entry::Occupied(mut entry) => {
                entry.insert(Arc::clone(&state));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&state));
            }
        }
        Some(state)
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Get a document's state.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///tmp/{}", name)).unwrap()
    }

    #[test]
    fn open_replaces_previous_snapshot() {
        let store = DocumentStore::new();
        store.open(uri("a.txt"), "one".to_string(), 1);
        let old = store.get(&uri("a.txt")).unwrap();
        store.open(uri("a.txt"), "one\ntwo".to_string(), 2);

        let current = store.get(&uri("a.txt")).unwrap();
        assert_eq!(current.version, 2);
        assert_eq!(current.line_index.line_count(), 2);
        // Snapshots handed out earlier stay immutable.
        assert_eq!(old.line_index.line_count(), 1);
    }

    #[test]
    fn out_of_order_version_is_ignored() {
        let store = DocumentStore::new();
        store.open(uri("c.txt"), "newer\ntext".to_string(), 5);
        assert!(store.open(uri("c.txt"), "older".to_string(), 4).is_none());

        let current = store.get(&uri("c.txt")).unwrap();
        assert_eq!(current.version, 5);
        assert_eq!(current.line_index.line_text(0), "newer");
        // A reopened document may restart its numbering.
        store.close(&uri("c.txt"));
        assert!(store.open(uri("c.txt"), "fresh".to_string(), 1).is_some());
    }

    #[test]
    fn close_forgets_document() {
        let store = DocumentStore::new();
        store.open(uri("b.txt"), "text".to_string(), 0);
        store.close(&uri("b.txt"));
        assert!(store.get(&uri("b.txt")).is_none());
    }
}
