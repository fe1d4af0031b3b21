//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use create_tigris_app::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("client_id", "my-client");
//!
//! let answer = ui.prompt(&Prompt::input("client_id", "What is the clientId?")).unwrap();
//! assert_eq!(answer, "my-client");
//!
//! ui.success("Done!");
//! assert!(ui.has_success("Done!"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, ScaffoldError};

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Status of a mock spinner when finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    /// Finished successfully.
    Success,
    /// Finished with error.
    Error,
    /// Finished as skipped.
    Skipped,
}

/// A spinner's start message, final message and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    pub started: String,
    pub finished: Option<(SpinnerStatus, String)>,
}

/// Mock UI implementation for testing.
///
/// Captures all UI interactions and allows pre-configured prompt responses.
/// Prompts without a configured response fall back to their default, then
/// fail with [`ScaffoldError::MissingValue`].
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    spinners: Rc<RefCell<Vec<SpinnerRecord>>>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get every spinner started, with how it finished.
    pub fn spinners(&self) -> Vec<SpinnerRecord> {
        self.spinners.borrow().clone()
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown, directly or by a spinner.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
            || self.spinner_finished(SpinnerStatus::Success, msg)
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown, directly or by a spinner.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
            || self.spinner_finished(SpinnerStatus::Error, msg)
    }

    /// Check if a spinner finished as skipped with a message containing `msg`.
    pub fn has_skipped(&self, msg: &str) -> bool {
        self.spinner_finished(SpinnerStatus::Skipped, msg)
    }

    fn spinner_finished(&self, status: SpinnerStatus, msg: &str) -> bool {
        self.spinners.borrow().iter().any(|s| {
            s.finished
                .as_ref()
                .is_some_and(|(st, m)| *st == status && m.contains(msg))
        })
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        self.prompts_shown.push(prompt.key.clone());

        self.prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .cloned()
            .ok_or_else(|| ScaffoldError::MissingValue {
                name: prompt.key.clone(),
                usage: "no mock response configured".to_string(),
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let index = {
            let mut spinners = self.spinners.borrow_mut();
            spinners.push(SpinnerRecord {
                started: message.to_string(),
                finished: None,
            });
            spinners.len() - 1
        };
        Box::new(MockSpinner {
            log: Rc::clone(&self.spinners),
            index,
        })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that reports its finish back to the owning [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    log: Rc<RefCell<Vec<SpinnerRecord>>>,
    index: usize,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        if let Some(record) = self.log.borrow_mut().get_mut(self.index) {
            record.finished = Some((status, msg.to_string()));
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("Creating a new app");
        ui.warning("offline");
        ui.error("boom");

        assert!(ui.has_message("new app"));
        assert!(ui.has_warning("offline"));
        assert!(ui.has_error("boom"));
    }

    #[test]
    fn configured_response_then_default() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("uri", "localhost:8081");

        assert_eq!(
            ui.prompt(&Prompt::input("uri", "What is the URI?")).unwrap(),
            "localhost:8081"
        );
        assert_eq!(
            ui.prompt(&Prompt::input("project", "Name?").with_default("myapp"))
                .unwrap(),
            "myapp"
        );
        assert!(ui.prompt(&Prompt::input("client_id", "Id?")).is_err());
        assert_eq!(ui.prompts_shown(), &["uri", "project", "client_id"]);
    }

    #[test]
    fn spinners_record_outcome() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Downloading template");
        spinner.finish_success("Downloaded template");
        let mut skipped = ui.start_spinner("Initializing git");
        skipped.finish_skipped("already versioned");

        let spinners = ui.spinners();
        assert_eq!(spinners.len(), 2);
        assert_eq!(spinners[0].started, "Downloading template");
        assert!(ui.has_success("Downloaded template"));
        assert!(ui.has_skipped("already versioned"));
    }

    #[test]
    fn default_is_not_interactive() {
        let mut ui = MockUI::new();
        assert!(!ui.is_interactive());
        ui.set_interactive(true);
        assert!(ui.is_interactive());
    }
}
