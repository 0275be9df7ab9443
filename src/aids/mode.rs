use serde::{Deserialize, Serialize};

/// An independently toggleable reading aid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AidMode {
    /// Highlight the line holding the cursor.
    LineFocus,
    /// Hide every line except the active one.
    TextMasking,
    /// Highlight the token under the cursor and fade everything else.
    CursorTracking,
    /// Tint the whole document.
    ColorOverlay,
}

impl AidMode {
    pub const ALL: [AidMode; 4] = [
        AidMode::LineFocus,
        AidMode::TextMasking,
        AidMode::CursorTracking,
        AidMode::ColorOverlay,
    ];

    /// Human-readable name used in notices.
    pub fn label(self) -> &'static str {
        match self {
            AidMode::LineFocus => "Line Focus",
            AidMode::TextMasking => "Text Masking",
            AidMode::CursorTracking => "Cursor Tracking",
            AidMode::ColorOverlay => "Color Overlay",
        }
    }

    /// Whether the mode recomputes on every cursor move.
    pub fn follows_selection(self) -> bool {
        !matches!(self, AidMode::ColorOverlay)
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            AidMode::LineFocus => 0,
            AidMode::TextMasking => 1,
            AidMode::CursorTracking => 2,
            AidMode::ColorOverlay => 3,
        }
    }
}

/// Proof of a registered selection listener. Cancelled through the registry
/// that issued it.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
    mode: AidMode,
}

impl Subscription {
    pub fn mode(&self) -> AidMode {
        self.mode
    }
}

/// Selection-change listeners of one editor, kept in registration order.
#[derive(Debug, Default)]
pub struct SelectionListeners {
    next_id: u64,
    listeners: Vec<(u64, AidMode)>,
}

impl SelectionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mode` for selection changes.
    pub fn subscribe(&mut self, mode: AidMode) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, mode));
        Subscription { id, mode }
    }

    /// Detach a listener. Consumes the subscription so it cannot be cancelled twice.
    pub fn cancel(&mut self, subscription: Subscription) {
        self.listeners.retain(|(id, _)| *id != subscription.id);
    }

    /// Listening modes in the order they subscribed.
    pub fn modes(&self) -> Vec<AidMode> {
        self.listeners.iter().map(|(_, mode)| *mode).collect()
    }

    /// Number of live subscriptions.
    pub fn count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_keep_registration_order() {
        let mut listeners = SelectionListeners::new();
        let tracking = listeners.subscribe(AidMode::CursorTracking);
        let _focus = listeners.subscribe(AidMode::LineFocus);
        assert_eq!(
            listeners.modes(),
            vec![AidMode::CursorTracking, AidMode::LineFocus]
        );

        listeners.cancel(tracking);
        assert_eq!(listeners.modes(), vec![AidMode::LineFocus]);
    }

    #[test]
    fn resubscribing_issues_fresh_ids() {
        let mut listeners = SelectionListeners::new();
        let first = listeners.subscribe(AidMode::TextMasking);
        listeners.cancel(first);
        let second = listeners.subscribe(AidMode::TextMasking);
        assert_eq!(second.mode(), AidMode::TextMasking);
        assert_eq!(listeners.count(), 1);
    }

    #[test]
    fn mode_names_serialize_camel_case() {
        let json = serde_json::to_string(&AidMode::CursorTracking).unwrap();
        assert_eq!(json, "\"cursorTracking\"");
        assert!(!AidMode::ColorOverlay.follows_selection());
    }
}
