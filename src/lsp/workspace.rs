//! Routing of editor events and commands to per-editor sessions.

use std::collections::HashMap;

use tower_lsp::lsp_types::{Position, Range, Url};

use super::commands::{AidCommand, ParsedCommand};
use super::protocol::{DecorateParams, DecorationBatch};
use crate::aids::{AidMode, AidPreferences, AidSession, SelectionOutcome};
use crate::document::{DocumentStore, LineIndex};
use crate::error::{AidError, Result};

/// What a command did, for the notice shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub message: String,
    pub batches: Vec<DecorateParams>,
}

/// All editor sessions plus the preferences they share.
#[derive(Debug, Default)]
pub struct Workspace {
    preferences: AidPreferences,
    sessions: HashMap<Url, AidSession>,
    /// The editor that last reported a selection or gained focus.
    active: Option<Url>,
    next_handle: u64,
}

impl Workspace {
    pub fn new(preferences: AidPreferences) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    pub fn set_preferences(&mut self, preferences: AidPreferences) {
        self.preferences = preferences;
    }

    pub fn active_editor(&self) -> Option<&Url> {
        self.active.as_ref()
    }

    pub fn session(&self, uri: &Url) -> Option<&AidSession> {
        self.sessions.get(uri)
    }

    /// Run `f` against the session for `uri`, creating it first if needed, and
    /// package whatever it rendered.
    fn with_session<T>(
        &mut self,
        uri: &Url,
        index: &LineIndex,
        sequence: u64,
        f: impl FnOnce(&mut AidSession, &mut DecorationBatch<'_>) -> T,
    ) -> (T, Option<DecorateParams>) {
        let mut batch = DecorationBatch::new(&mut self.next_handle);
        let session = self
            .sessions
            .entry(uri.clone())
            .or_insert_with(|| AidSession::open(&self.preferences, index, &mut batch));
        let value = f(session, &mut batch);
        (value, batch.into_params(uri.clone(), sequence))
    }

    /// A document was opened or its text replaced.
    pub fn document_changed(
        &mut self,
        uri: &Url,
        index: &LineIndex,
        sequence: u64,
    ) -> Option<DecorateParams> {
        let existed = self.sessions.contains_key(uri);
        let ((), batch) = self.with_session(uri, index, sequence, |session, batch| {
            if existed {
                session.refresh(index, batch);
            }
        });
        batch
    }

    /// A document was closed: drop its session and release its handles.
    pub fn document_closed(&mut self, uri: &Url, sequence: u64) -> Option<DecorateParams> {
        if self.active.as_ref() == Some(uri) {
            self.active = None;
        }
        let session = self.sessions.remove(uri)?;
        let mut batch = DecorationBatch::new(&mut self.next_handle);
        session.close(&mut batch);
        batch.into_params(uri.clone(), sequence)
    }

    /// The cursor moved in `uri`, or `uri` gained focus. Either way it becomes
    /// the active editor and its listening modes recompute.
    pub fn selection_changed(
        &mut self,
        uri: &Url,
        index: &LineIndex,
        sequence: u64,
        selection: Range,
        active: Position,
    ) -> (Result<SelectionOutcome>, Option<DecorateParams>) {
        self.active = Some(uri.clone());
        // A freshly created session has handles to announce even if the
        // selection itself is rejected, so the batch is returned either way.
        self.with_session(uri, index, sequence, |session, batch| {
            session.on_selection(sequence, selection, active, index, batch)
        })
    }

    /// Carry out a command.
    pub fn execute(
        &mut self,
        parsed: ParsedCommand,
        documents: &DocumentStore,
        sequence: u64,
    ) -> Result<CommandOutcome> {
        match parsed.command {
            AidCommand::Toggle { mode, enabled } => {
                let uri = parsed
                    .uri
                    .or_else(|| self.active.clone())
                    .ok_or(AidError::NoActiveDocument)?;
                let document = documents.get(&uri).ok_or(AidError::NoActiveDocument)?;

                let mut batches = Vec::new();
                if let Some(overlay) = parsed.overlay {
                    self.preferences.overlay = overlay;
                    batches.extend(self.restyle_all(AidMode::ColorOverlay, documents, sequence));
                }

                let index = &document.line_index;
                let (now_enabled, batch) =
                    self.with_session(&uri, index, sequence, |session, batch| {
                        let target = enabled.unwrap_or(!session.is_enabled(mode));
                        session.set_enabled(mode, target, index, batch);
                        target
                    });
                batches.extend(batch);

                let state = if now_enabled { "Enabled" } else { "Disabled" };
                Ok(CommandOutcome {
                    message: format!("{} {}", mode.label(), state),
                    batches,
                })
            }
            AidCommand::SetLineFocusColor(color) => {
                self.preferences.line_focus_color = color;
                Ok(CommandOutcome {
                    message: format!("Line focus color set to {}", color.name()),
                    batches: self.restyle_all(AidMode::LineFocus, documents, sequence),
                })
            }
            AidCommand::SetTrackingColor(color) => {
                self.preferences.tracking_color = color;
                Ok(CommandOutcome {
                    message: format!("Tracking aid color set to {}", color.name()),
                    batches: self.restyle_all(AidMode::CursorTracking, documents, sequence),
                })
            }
            AidCommand::SetOverlayColor(overlay) => {
                self.preferences.overlay = overlay;
                Ok(CommandOutcome {
                    message: format!("Overlay color set to {}", overlay),
                    batches: self.restyle_all(AidMode::ColorOverlay, documents, sequence),
                })
            }
        }
    }

    /// Rebuild the handles of `mode` in every open editor from the current preferences.
    fn restyle_all(
        &mut self,
        mode: AidMode,
        documents: &DocumentStore,
        sequence: u64,
    ) -> Vec<DecorateParams> {
        let mut batches = Vec::new();
        for (uri, session) in &mut self.sessions {
            let Some(document) = documents.get(uri) else {
                continue;
            };
            let mut batch = DecorationBatch::new(&mut self.next_handle);
            session.restyle(mode, &self.preferences, &document.line_index, &mut batch);
            batches.extend(batch.into_params(uri.clone(), sequence));
        }
        batches.sort_by(|a, b| a.uri.cmp(&b.uri));
        batches
    }
}
