//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap's derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, CreateArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
