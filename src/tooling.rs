//! Tooling & Integration Layer
//!
//! The command-line front end and the editor collaborator it supplies to
//! node creation and editing.

pub mod cli;
pub mod editor;

pub use cli::{Cli, CliContext, Commands};
pub use editor::CommandEditor;
