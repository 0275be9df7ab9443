//! Settings infrastructure for the reading aids server.
//!
//! This module provides support for loading and parsing `reading-aids.toml`
//! files that choose colors and which aids start enabled for new editors.
//! The same shape is accepted as LSP `initializationOptions`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::aids::{AidMode, AidPreferences, OverlayColor};

/// File name searched for by `discover_settings`.
pub const SETTINGS_FILE: &str = "reading-aids.toml";

/// Root settings structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub line_focus: Option<ModeSettings>,
    pub text_masking: Option<ModeSettings>,
    pub cursor_tracking: Option<ModeSettings>,
    pub overlay: Option<OverlaySettings>,
}

/// Settings shared by the cursor-following aids.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ModeSettings {
    /// Enable the aid for every newly opened editor.
    pub enabled: Option<bool>,

    /// Palette color name. Ignored for text masking.
    pub color: Option<String>,
}

/// Color overlay settings.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct OverlaySettings {
    pub enabled: Option<bool>,

    /// `#RRGGBB` tint.
    pub color: Option<String>,

    /// Tint opacity in [0, 1].
    pub opacity: Option<f32>,
}

impl ModeSettings {
    fn merge(self, over: ModeSettings) -> ModeSettings {
        ModeSettings {
            enabled: over.enabled.or(self.enabled),
            color: over.color.or(self.color),
        }
    }
}

impl OverlaySettings {
    fn merge(self, over: OverlaySettings) -> OverlaySettings {
        OverlaySettings {
            enabled: over.enabled.or(self.enabled),
            color: over.color.or(self.color),
            opacity: over.opacity.or(self.opacity),
        }
    }
}

fn merge_table<T>(
    base: Option<T>,
    over: Option<T>,
    merge: impl FnOnce(T, T) -> T,
) -> Option<T> {
    match (base, over) {
        (Some(base), Some(over)) => Some(merge(base, over)),
        (base, over) => over.or(base),
    }
}

impl Settings {
    /// Layer `over` on top of these settings, field by field.
    pub fn merged_with(self, over: Settings) -> Settings {
        Settings {
            line_focus: merge_table(self.line_focus, over.line_focus, ModeSettings::merge),
            text_masking: merge_table(self.text_masking, over.text_masking, ModeSettings::merge),
            cursor_tracking: merge_table(
                self.cursor_tracking,
                over.cursor_tracking,
                ModeSettings::merge,
            ),
            overlay: merge_table(self.overlay, over.overlay, OverlaySettings::merge),
        }
    }

    /// Resolve into preferences. Invalid entries warn and keep their defaults.
    pub fn to_preferences(&self) -> AidPreferences {
        let mut prefs = AidPreferences::default();

        if let Some(line_focus) = &self.line_focus {
            if let Some(color) = &line_focus.color {
                match color.parse() {
                    Ok(color) => prefs.line_focus_color = color,
                    Err(e) => eprintln!("Warning: line_focus: {}", e),
                }
            }
        }

        if let Some(tracking) = &self.cursor_tracking {
            if let Some(color) = &tracking.color {
                match color.parse() {
                    Ok(color) => prefs.tracking_color = color,
                    Err(e) => eprintln!("Warning: cursor_tracking: {}", e),
                }
            }
        }

        if let Some(overlay) = &self.overlay {
            match OverlayColor::parse(overlay.color.as_deref(), overlay.opacity) {
                Ok(color) => prefs.overlay = color,
                Err(e) => eprintln!("Warning: overlay: {}", e),
            }
        }

        let enabled = [
            (AidMode::LineFocus, self.line_focus.as_ref().and_then(|s| s.enabled)),
            (AidMode::TextMasking, self.text_masking.as_ref().and_then(|s| s.enabled)),
            (AidMode::CursorTracking, self.cursor_tracking.as_ref().and_then(|s| s.enabled)),
            (AidMode::ColorOverlay, self.overlay.as_ref().and_then(|s| s.enabled)),
        ];
        prefs.enabled_on_open = enabled
            .into_iter()
            .filter(|(_, on)| *on == Some(true))
            .map(|(mode, _)| mode)
            .collect();

        prefs
    }
}

/// Parse settings from LSP `initializationOptions`.
///
/// Returns default settings if the value is absent or malformed.
pub fn settings_from_json(value: Option<serde_json::Value>) -> Settings {
    match value {
        None | Some(serde_json::Value::Null) => Settings::default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: failed to parse initializationOptions: {}", e);
                Settings::default()
            }
        },
    }
}

/// Load settings from a `reading-aids.toml` file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: failed to parse {}: {}", SETTINGS_FILE, e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover `reading-aids.toml` by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, Some(settings_dir))` for the directory holding the file,
/// or `(Settings::default(), None)` when no file was found.
pub fn discover_settings(start_dir: &Path) -> (Settings, Option<PathBuf>) {
    // Phase 1: Walk up from start_dir
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_settings(&candidate), Some(dir.to_path_buf()));
        }
        current = dir.parent();
    }

    // Phase 2: Check immediate child directories
    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_settings(&candidate), Some(entry.path()));
                }
            }
        }
    }

    (Settings::default(), None)
}
