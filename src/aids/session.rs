//! Per-editor reading aid state.
//!
//! Each open editor owns one `AidSession`. A mode is either disabled or enabled;
//! enabling subscribes it to selection changes (except the overlay) and renders
//! its regions, disabling cancels the subscription and clears its decorations.
//! Repeating either transition is a no-op.

use tower_lsp::lsp_types::{Position, Range};

use super::host::{DecorationHandle, DecorationHost};
use super::mode::{AidMode, SelectionListeners, Subscription};
use super::style::AidPreferences;
use crate::document::LineIndex;
use crate::error::Result;
use crate::regions::{
    select_line_focus, select_masked_regions, select_overlay_regions, select_tracked_selection,
};

/// Result of feeding a selection change into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Decorations were recomputed from the new selection.
    Applied,
    /// A newer selection was already applied; this one was dropped.
    Stale,
}

#[derive(Debug)]
struct ModeSlot {
    enabled: bool,
    subscription: Option<Subscription>,
    handles: Vec<DecorationHandle>,
}

/// Mode state and decoration handles for a single editor.
#[derive(Debug)]
pub struct AidSession {
    slots: [ModeSlot; 4],
    listeners: SelectionListeners,
    selection: Range,
    active: Position,
    /// Sequence number of the newest selection applied.
    last_sequence: Option<u64>,
}

impl AidSession {
    /// Create decoration handles for every mode and enable the modes the
    /// preferences switch on for new editors.
    pub fn open(prefs: &AidPreferences, index: &LineIndex, host: &mut impl DecorationHost) -> Self {
        let slots = AidMode::ALL.map(|mode| ModeSlot {
            enabled: false,
            subscription: None,
            handles: prefs
                .styles(mode)
                .iter()
                .map(|style| host.create_decoration(style))
                .collect(),
        });

        let mut session = Self {
            slots,
            listeners: SelectionListeners::new(),
            selection: Range::default(),
            active: Position::default(),
            last_sequence: None,
        };
        for &mode in &prefs.enabled_on_open {
            session.set_enabled(mode, true, index, host);
        }
        session
    }

    pub fn is_enabled(&self, mode: AidMode) -> bool {
        self.slots[mode.slot()].enabled
    }

    pub fn enabled_modes(&self) -> Vec<AidMode> {
        AidMode::ALL
            .into_iter()
            .filter(|&mode| self.is_enabled(mode))
            .collect()
    }

    /// Number of modes currently listening for selection changes.
    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn selection(&self) -> Range {
        self.selection
    }

    pub fn active(&self) -> Position {
        self.active
    }

    /// Handles owned by `mode`, in style order.
    pub fn handles(&self, mode: AidMode) -> &[DecorationHandle] {
        &self.slots[mode.slot()].handles
    }

    /// Move `mode` to the requested state. Returns whether anything changed.
    pub fn set_enabled(
        &mut self,
        mode: AidMode,
        enabled: bool,
        index: &LineIndex,
        host: &mut impl DecorationHost,
    ) -> bool {
        if self.is_enabled(mode) == enabled {
            return false;
        }

        if enabled {
            let subscription = mode
                .follows_selection()
                .then(|| self.listeners.subscribe(mode));
            let slot = &mut self.slots[mode.slot()];
            slot.enabled = true;
            slot.subscription = subscription;
            self.render(mode, index, host);
        } else {
            let slot = &mut self.slots[mode.slot()];
            slot.enabled = false;
            if let Some(subscription) = slot.subscription.take() {
                self.listeners.cancel(subscription);
            }
            for &handle in &self.slots[mode.slot()].handles {
                host.apply_decoration(handle, Vec::new());
            }
        }
        true
    }

    /// Flip `mode`. Returns the new state.
    pub fn toggle(
        &mut self,
        mode: AidMode,
        index: &LineIndex,
        host: &mut impl DecorationHost,
    ) -> bool {
        let enabled = !self.is_enabled(mode);
        self.set_enabled(mode, enabled, index, host);
        enabled
    }

    /// Apply a selection change numbered `sequence` in arrival order.
    ///
    /// Selections older than the newest one already applied are dropped so a
    /// late update never overwrites a fresher one.
    pub fn on_selection(
        &mut self,
        sequence: u64,
        selection: Range,
        active: Position,
        index: &LineIndex,
        host: &mut impl DecorationHost,
    ) -> Result<SelectionOutcome> {
        if self.last_sequence.is_some_and(|last| sequence <= last) {
            return Ok(SelectionOutcome::Stale);
        }
        index.check_position(active)?;

        self.last_sequence = Some(sequence);
        self.active = index.clamp_position(active);
        self.selection = Range::new(
            index.clamp_position(selection.start),
            index.clamp_position(selection.end),
        );

        for mode in self.listeners.modes() {
            self.render(mode, index, host);
        }
        Ok(SelectionOutcome::Applied)
    }

    /// Recompute every enabled mode, e.g. after the text changed or the editor
    /// regained focus. The stored selection is clamped into the new text.
    pub fn refresh(&mut self, index: &LineIndex, host: &mut impl DecorationHost) {
        self.active = index.clamp_position(self.active);
        self.selection = Range::new(
            index.clamp_position(self.selection.start),
            index.clamp_position(self.selection.end),
        );
        for mode in self.enabled_modes() {
            self.render(mode, index, host);
        }
    }

    /// Replace the handles of `mode` with ones built from the current
    /// preferences, re-applying regions if the mode is on.
    pub fn restyle(
        &mut self,
        mode: AidMode,
        prefs: &AidPreferences,
        index: &LineIndex,
        host: &mut impl DecorationHost,
    ) {
        let fresh = prefs
            .styles(mode)
            .iter()
            .map(|style| host.create_decoration(style))
            .collect();
        let stale = std::mem::replace(&mut self.slots[mode.slot()].handles, fresh);

        if self.is_enabled(mode) {
            self.render(mode, index, host);
        }
        for handle in stale {
            host.dispose_decoration(handle);
        }
    }

    /// Tear down: detach listeners and dispose every handle.
    pub fn close(mut self, host: &mut impl DecorationHost) {
        for slot in &mut self.slots {
            if let Some(subscription) = slot.subscription.take() {
                self.listeners.cancel(subscription);
            }
            for &handle in &slot.handles {
                host.dispose_decoration(handle);
            }
        }
    }

    fn render(&self, mode: AidMode, index: &LineIndex, host: &mut impl DecorationHost) {
        let handles = &self.slots[mode.slot()].handles;
        match mode {
            AidMode::LineFocus => {
                host.apply_decoration(handles[0], vec![select_line_focus(index, self.active)]);
            }
            AidMode::TextMasking => {
                host.apply_decoration(handles[0], select_masked_regions(index, self.active.line));
            }
            AidMode::CursorTracking => {
                let region = select_tracked_selection(index, self.selection, self.active);
                host.apply_decoration(handles[0], vec![region.highlight]);
                host.apply_decoration(handles[1], region.fades);
            }
            AidMode::ColorOverlay => {
                host.apply_decoration(handles[0], select_overlay_regions(index));
            }
        }
    }
}
