//! LSP protocol surface.
//!
//! This module provides:
//! - Custom notifications for selection changes and decoration batches
//! - `workspace/executeCommand` parsing
//! - `Workspace`, which routes events and commands to editor sessions

mod commands;
mod protocol;
mod workspace;

pub use commands::{command_names, parse_command, AidCommand, ParsedCommand};
pub use protocol::{
    Decorate, DecorateParams, DecorationBatch, DecorationOp, DidChangeActiveEditor,
    DidChangeSelection, SelectionParams,
};
pub use workspace::{CommandOutcome, Workspace};
