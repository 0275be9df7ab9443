//! Error types for the reading aids server.

use thiserror::Error;

/// Result type alias for reading aid operations.
pub type Result<T> = std::result::Result<T, AidError>;

/// Errors raised around the region selectors.
///
/// The selectors themselves are total; these come from the layer that resolves
/// the active editor, validates positions and parses command arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AidError {
    #[error("No active text editor")]
    NoActiveDocument,

    #[error("line {line} is outside the document ({line_count} lines)")]
    InvalidPosition { line: u32, line_count: u32 },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid command argument: {0}")]
    InvalidArgument(String),

    #[error("unknown color: '{0}'")]
    UnknownColor(String),

    #[error("invalid overlay color: '{0}' (expected #RRGGBB)")]
    InvalidOverlayColor(String),

    #[error("overlay opacity must be between 0 and 1, got {0}")]
    InvalidOpacity(f32),
}

impl AidError {
    /// How a failed command is answered: missing editor state is a notice for
    /// the user, anything else is a bad request from the client.
    pub fn into_notice(self) -> tower_lsp::jsonrpc::Result<String> {
        match self {
            e @ AidError::NoActiveDocument => Ok(e.to_string()),
            e => Err(tower_lsp::jsonrpc::Error::invalid_params(e.to_string())),
        }
    }
}
