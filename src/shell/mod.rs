//! External process execution.

pub mod platform;
pub mod recording;
pub mod runner;

pub use platform::is_ci;
pub use recording::RecordingRunner;
pub use runner::{CommandSpec, CommandStatus, ProcessRunner, SystemRunner};
