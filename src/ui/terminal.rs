//! Interactive terminal UI.

use console::Term;

use crate::error::Result;

use super::{
    prompt_user, AppTheme, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, SpinnerHandle,
    UserInterface,
};

/// UI for a user sitting at a terminal: colored status lines and dialoguer
/// prompts on stdout, errors on stderr.
pub struct TerminalUI {
    term: Term,
    theme: AppTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: AppTheme::detect(),
            mode,
        }
    }

    /// Print `line` unless the output mode hides status output.
    fn status(&self, line: &str) {
        if self.mode.shows_status() {
            self.term.write_line(line).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status(msg);
    }

    fn success(&mut self, msg: &str) {
        self.status(&self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        self.status(&self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        Term::stderr().write_line(&self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = if self.mode.shows_spinners() {
            ProgressSpinner::new(message)
        } else {
            ProgressSpinner::hidden()
        };
        Box::new(spinner)
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// The terminal UI when `interactive` and attached to a TTY outside CI,
/// the prompt-from-environment UI otherwise.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && !crate::shell::is_ci() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
