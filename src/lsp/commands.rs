//! `workspace/executeCommand` parsing.

use serde::Deserialize;
use serde_json::Value;
use tower_lsp::lsp_types::Url;

use crate::aids::{AidMode, LineFocusColor, OverlayColor, TrackingColor};
use crate::error::{AidError, Result};

pub const TOGGLE_LINE_FOCUS: &str = "readingAids.toggleLineFocus";
pub const TOGGLE_TEXT_MASKING: &str = "readingAids.toggleTextMasking";
pub const TOGGLE_CURSOR_TRACKING: &str = "readingAids.toggleCursorTracking";
pub const TOGGLE_COLOR_OVERLAY: &str = "readingAids.toggleColorOverlay";
pub const SET_LINE_FOCUS_COLOR: &str = "readingAids.setLineFocusColor";
pub const SET_TRACKING_COLOR: &str = "readingAids.setTrackingColor";
pub const SET_OVERLAY_COLOR: &str = "readingAids.setOverlayColor";

/// Commands advertised in the server capabilities.
pub fn command_names() -> Vec<String> {
    [
        TOGGLE_LINE_FOCUS,
        TOGGLE_TEXT_MASKING,
        TOGGLE_CURSOR_TRACKING,
        TOGGLE_COLOR_OVERLAY,
        SET_LINE_FOCUS_COLOR,
        SET_TRACKING_COLOR,
        SET_OVERLAY_COLOR,
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

/// The single optional argument object every command accepts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandArgs {
    uri: Option<Url>,
    enabled: Option<bool>,
    color: Option<String>,
    opacity: Option<f32>,
}

/// What a command asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum AidCommand {
    /// Switch a mode; `None` flips it.
    Toggle {
        mode: AidMode,
        enabled: Option<bool>,
    },
    SetLineFocusColor(LineFocusColor),
    SetTrackingColor(TrackingColor),
    SetOverlayColor(OverlayColor),
}

/// A parsed command and the editor it targets (None means the active editor).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub command: AidCommand,
    pub uri: Option<Url>,
    /// Overlay tint to adopt before toggling the overlay on.
    pub overlay: Option<OverlayColor>,
}

/// Parse a command name and its JSON arguments.
pub fn parse_command(name: &str, arguments: &[Value]) -> Result<ParsedCommand> {
    let args: CommandArgs = match arguments.first() {
        None | Some(Value::Null) => CommandArgs::default(),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| AidError::InvalidArgument(e.to_string()))?,
    };

    let toggle = |mode| AidCommand::Toggle {
        mode,
        enabled: args.enabled,
    };
    let require_color = || {
        args.color
            .as_deref()
            .ok_or_else(|| AidError::InvalidArgument("missing 'color'".to_string()))
    };

    let mut overlay = None;
    let command = match name {
        TOGGLE_LINE_FOCUS => toggle(AidMode::LineFocus),
        TOGGLE_TEXT_MASKING => toggle(AidMode::TextMasking),
        TOGGLE_CURSOR_TRACKING => toggle(AidMode::CursorTracking),
        TOGGLE_COLOR_OVERLAY => {
            if args.color.is_some() || args.opacity.is_some() {
                overlay = Some(OverlayColor::parse(args.color.as_deref(), args.opacity)?);
            }
            toggle(AidMode::ColorOverlay)
        }
        SET_LINE_FOCUS_COLOR => AidCommand::SetLineFocusColor(require_color()?.parse()?),
        SET_TRACKING_COLOR => AidCommand::SetTrackingColor(require_color()?.parse()?),
        SET_OVERLAY_COLOR => AidCommand::SetOverlayColor(OverlayColor::parse(
            args.color.as_deref(),
            args.opacity,
        )?),
        other => return Err(AidError::UnknownCommand(other.to_string())),
    };

    Ok(ParsedCommand {
        command,
        uri: args.uri,
        overlay,
    })
}
