//! Reading aids language server.
//!
//! Computes line focus, text masking, cursor tracking and color overlay regions
//! for the editors a client reports, and streams them back as decoration batches.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

pub mod aids;
mod document;
mod error;
pub mod lsp;
pub mod regions;
pub(crate) mod settings;

pub use document::{DocumentState, DocumentStore, LineIndex};
pub use error::AidError;
pub use settings::{discover_settings, load_settings, settings_from_json, Settings};

use aids::SelectionOutcome;
use lsp::{Decorate, DecorateParams, SelectionParams, Workspace};

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    /// Sessions are only touched under this lock, which is also held while
    /// their decoration batches are sent, so batches leave in lock order.
    workspace: Mutex<Workspace>,
    /// Arrival counter stamped on every event before it waits for the lock.
    sequence: AtomicU64,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            workspace: Mutex::new(Workspace::default()),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    /// Send decoration batches to the client, in order.
    async fn publish(&self, batches: impl IntoIterator<Item = DecorateParams>) {
        for batch in batches {
            self.client.send_notification::<Decorate>(batch).await;
        }
    }

    /// Store the new text and recompute the editor's enabled aids.
    async fn on_document_change(&self, uri: Url, text: String, version: i32) {
        let sequence = self.next_sequence();
        let Some(state) = self.documents.open(uri.clone(), text, version) else {
            self.client
                .log_message(
                    MessageType::LOG,
                    format!("ignored out-of-order version {} of {}", version, uri),
                )
                .await;
            return;
        };
        let mut workspace = self.workspace.lock().await;
        let batch = workspace.document_changed(&uri, &state.line_index, sequence);
        self.publish(batch).await;
    }

    /// Apply a selection or focus change reported by the client.
    async fn on_selection(&self, params: SelectionParams) {
        let sequence = self.next_sequence();
        let uri = params.text_document.uri;
        let Some(document) = self.documents.get(&uri) else {
            // Not an open document: nothing to decorate until it is.
            return;
        };

        let mut workspace = self.workspace.lock().await;
        let (outcome, batch) = workspace.selection_changed(
            &uri,
            &document.line_index,
            sequence,
            params.selection,
            params.active,
        );
        self.publish(batch).await;

        match outcome {
            Ok(SelectionOutcome::Applied) => {}
            Ok(SelectionOutcome::Stale) => {
                self.client
                    .log_message(
                        MessageType::LOG,
                        format!("discarded stale selection #{} for {}", sequence, uri),
                    )
                    .await;
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::WARNING, format!("{}: {}", uri, e))
                    .await;
            }
        }
    }

    async fn did_change_selection(&self, params: SelectionParams) {
        self.on_selection(params).await;
    }

    async fn did_change_active_editor(&self, params: SelectionParams) {
        self.on_selection(params).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let mut settings = Settings::default();
        if let Some(root) = workspace_root {
            // Discover settings by walking up the directory tree
            let (found, settings_dir) = settings::discover_settings(&root);
            if let Some(dir) = settings_dir {
                self.client
                    .log_message(
                        MessageType::INFO,
                        format!("using {} from {}", settings::SETTINGS_FILE, dir.display()),
                    )
                    .await;
            }
            settings = found;
        }
        let settings = settings.merged_with(settings_from_json(params.initialization_options));
        self.workspace
            .lock()
            .await
            .set_preferences(settings.to_preferences());

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: lsp::command_names(),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "reading aids server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_document_change(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        )
        .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.on_document_change(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            )
            .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let sequence = self.next_sequence();
        let uri = params.text_document.uri;
        self.documents.close(&uri);
        let mut workspace = self.workspace.lock().await;
        let batch = workspace.document_closed(&uri, sequence);
        self.publish(batch).await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let sequence = self.next_sequence();
        let parsed = lsp::parse_command(&params.command, &params.arguments)
            .map_err(|e| Error::invalid_params(e.to_string()))?;

        let mut workspace = self.workspace.lock().await;
        match workspace.execute(parsed, &self.documents, sequence) {
            Ok(outcome) => {
                self.publish(outcome.batches).await;
                drop(workspace);
                self.client
                    .show_message(MessageType::INFO, outcome.message)
                    .await;
                Ok(None)
            }
            Err(e) => {
                let notice = e.into_notice()?;
                drop(workspace);
                self.client.show_message(MessageType::INFO, notice).await;
                Ok(None)
            }
        }
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(
            lsp::DidChangeSelection::METHOD,
            Backend::did_change_selection,
        )
        .custom_method(
            lsp::DidChangeActiveEditor::METHOD,
            Backend::did_change_active_editor,
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_can_be_created() {
        let (_service, _socket) = create_service();
    }
}
