//! Decoration styles and color palettes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::mode::AidMode;
use crate::error::{AidError, Result};

/// Visual style of a decoration, as the host renders it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_whole_line: bool,
}

/// Style that hides text: transparent glyphs on a solid black background.
pub fn masking_style() -> DecorationStyle {
    DecorationStyle {
        background_color: Some("rgba(0, 0, 0, 1)".to_string()),
        color: Some("rgba(0, 0, 0, 0)".to_string()),
        opacity: Some("1".to_string()),
        ..Default::default()
    }
}

/// Palette for the line focus highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineFocusColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
}

impl LineFocusColor {
    pub fn name(self) -> &'static str {
        match self {
            LineFocusColor::Yellow => "yellow",
            LineFocusColor::Blue => "blue",
            LineFocusColor::Green => "green",
            LineFocusColor::Pink => "pink",
        }
    }

    pub fn rgba(self) -> &'static str {
        match self {
            LineFocusColor::Yellow => "rgba(255, 255, 0, 0.3)",
            LineFocusColor::Blue => "rgba(0, 0, 255, 0.3)",
            LineFocusColor::Green => "rgba(0, 255, 0, 0.3)",
            LineFocusColor::Pink => "rgba(255, 105, 180, 0.3)",
        }
    }

    pub fn style(self) -> DecorationStyle {
        DecorationStyle {
            background_color: Some(self.rgba().to_string()),
            ..Default::default()
        }
    }
}

impl FromStr for LineFocusColor {
    type Err = AidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(LineFocusColor::Yellow),
            "blue" => Ok(LineFocusColor::Blue),
            "green" => Ok(LineFocusColor::Green),
            "pink" => Ok(LineFocusColor::Pink),
            _ => Err(AidError::UnknownColor(s.to_string())),
        }
    }
}

/// Palette for the cursor tracking highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingColor {
    #[default]
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
}

impl TrackingColor {
    pub fn name(self) -> &'static str {
        match self {
            TrackingColor::Blue => "blue",
            TrackingColor::Green => "green",
            TrackingColor::Red => "red",
            TrackingColor::Yellow => "yellow",
            TrackingColor::Purple => "purple",
        }
    }

    pub fn rgba(self) -> &'static str {
        match self {
            TrackingColor::Blue => "rgba(0, 0, 255, 0.3)",
            TrackingColor::Green => "rgba(0, 255, 0, 0.3)",
            TrackingColor::Red => "rgba(255, 0, 0, 0.3)",
            TrackingColor::Yellow => "rgba(255, 255, 0, 0.3)",
            TrackingColor::Purple => "rgba(128, 0, 128, 0.3)",
        }
    }

    pub fn style(self) -> DecorationStyle {
        DecorationStyle {
            background_color: Some(self.rgba().to_string()),
            border: Some(format!("1px solid {}", self.name())),
            ..Default::default()
        }
    }
}

impl FromStr for TrackingColor {
    type Err = AidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(TrackingColor::Blue),
            "green" => Ok(TrackingColor::Green),
            "red" => Ok(TrackingColor::Red),
            "yellow" => Ok(TrackingColor::Yellow),
            "purple" => Ok(TrackingColor::Purple),
            _ => Err(AidError::UnknownColor(s.to_string())),
        }
    }
}

/// Tint for the color overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub opacity: f32,
}

impl Default for OverlayColor {
    fn default() -> Self {
        Self {
            red: 0xFF,
            green: 0xFF,
            blue: 0xFF,
            opacity: 0.2,
        }
    }
}

impl OverlayColor {
    /// Build an overlay color from a `#RRGGBB` string and an opacity.
    ///
    /// Colors without a leading `#` (or no color at all) fall back to white;
    /// a missing opacity means 0.2.
    pub fn parse(color: Option<&str>, opacity: Option<f32>) -> Result<Self> {
        let mut overlay = OverlayColor::default();

        if let Some(hex) = color.and_then(|c| c.trim().strip_prefix('#')) {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AidError::InvalidOverlayColor(format!("#{}", hex)));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| AidError::InvalidOverlayColor(format!("#{}", hex)))
            };
            overlay.red = channel(0)?;
            overlay.green = channel(2)?;
            overlay.blue = channel(4)?;
        }

        if let Some(opacity) = opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(AidError::InvalidOpacity(opacity));
            }
            overlay.opacity = opacity;
        }

        Ok(overlay)
    }

    pub fn style(&self) -> DecorationStyle {
        DecorationStyle {
            background_color: Some(self.to_string()),
            is_whole_line: true,
            ..Default::default()
        }
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.opacity
        )
    }
}

/// Workspace-wide appearance choices shared by every editor session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AidPreferences {
    pub line_focus_color: LineFocusColor,
    pub tracking_color: TrackingColor,
    pub overlay: OverlayColor,
    /// Modes switched on for every newly opened editor.
    pub enabled_on_open: Vec<AidMode>,
}

impl AidPreferences {
    /// Styles for the decoration handles a mode owns, in handle order.
    ///
    /// Cursor tracking owns two: the highlight, then the fade.
    pub fn styles(&self, mode: AidMode) -> Vec<DecorationStyle> {
        match mode {
            AidMode::LineFocus => vec![self.line_focus_color.style()],
            AidMode::TextMasking => vec![masking_style()],
            AidMode::CursorTracking => vec![self.tracking_color.style(), masking_style()],
            AidMode::ColorOverlay => vec![self.overlay.style()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_names_parse_case_insensitively() {
        assert_eq!("Pink".parse::<LineFocusColor>(), Ok(LineFocusColor::Pink));
        assert_eq!("purple".parse::<TrackingColor>(), Ok(TrackingColor::Purple));
        assert_eq!(
            "pink".parse::<TrackingColor>(),
            Err(AidError::UnknownColor("pink".to_string()))
        );
    }

    #[test]
    fn tracking_style_has_border() {
        let style = TrackingColor::Red.style();
        assert_eq!(style.background_color.as_deref(), Some("rgba(255, 0, 0, 0.3)"));
        assert_eq!(style.border.as_deref(), Some("1px solid red"));
    }

    #[test]
    fn overlay_parses_hex_and_opacity() {
        let overlay = OverlayColor::parse(Some("#1a2B3c"), Some(0.5)).unwrap();
        assert_eq!(overlay.to_string(), "rgba(26, 43, 60, 0.5)");
        assert!(overlay.style().is_whole_line);
    }

    #[test]
    fn overlay_defaults_to_translucent_white() {
        let overlay = OverlayColor::parse(Some("teal"), None).unwrap();
        assert_eq!(overlay.to_string(), "rgba(255, 255, 255, 0.2)");
        assert_eq!(OverlayColor::parse(None, None).unwrap(), overlay);
    }

    #[test]
    fn overlay_rejects_bad_input() {
        assert_eq!(
            OverlayColor::parse(Some("#12345"), None),
            Err(AidError::InvalidOverlayColor("#12345".to_string()))
        );
        assert_eq!(
            OverlayColor::parse(Some("#GG0000"), None),
            Err(AidError::InvalidOverlayColor("#GG0000".to_string()))
        );
        assert_eq!(
            OverlayColor::parse(None, Some(1.5)),
            Err(AidError::InvalidOpacity(1.5))
        );
    }

    #[test]
    fn style_serializes_only_set_fields() {
        let json = serde_json::to_value(masking_style()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "backgroundColor": "rgba(0, 0, 0, 1)",
                "color": "rgba(0, 0, 0, 0)",
                "opacity": "1"
            })
        );
    }

    #[test]
    fn tracking_owns_two_styles() {
        let prefs = AidPreferences::default();
        let styles = prefs.styles(AidMode::CursorTracking);
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[1], masking_style());
    }
}
