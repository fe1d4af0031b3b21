//! `create-tigris-app completions <shell>`: print a completion script.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use super::dispatcher::{Command, CommandResult};
use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;

const BIN_NAME: &str = "create-tigris-app";

/// Writes the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}

pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        write_completions(self.args.shell, &mut std::io::stdout());
        Ok(CommandResult::success())
    }
}
