//! Recording process runner for testing.
//!
//! `RecordingRunner` implements [`ProcessRunner`] without spawning anything.
//! It records every [`CommandSpec`] it receives and answers with scripted
//! outcomes, defaulting to success.
//!
//! # Example
//!
//! ```
//! use create_tigris_app::shell::{CommandSpec, ProcessRunner, RecordingRunner};
//!
//! let runner = RecordingRunner::new();
//! runner.fail("git commit", 1);
//!
//! assert!(runner.succeeds(&CommandSpec::new("git", ["init"])));
//! assert!(!runner.succeeds(&CommandSpec::new("git", ["commit", "-m", "msg"])));
//! assert_eq!(runner.command_lines(), vec!["git init", "git commit -m msg"]);
//! ```

use std::cell::RefCell;
use std::io;

use super::runner::{CommandSpec, CommandStatus, ProcessRunner};

type Hook = Box<dyn Fn(&CommandSpec) -> io::Result<CommandStatus>>;

/// Process runner that records invocations and returns scripted results.
///
/// Rules match on a prefix of [`CommandSpec::command_line`]; the most
/// recently added matching rule wins.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    rules: RefCell<Vec<(String, Hook)>>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` exit with `code`.
    pub fn fail(&self, prefix: &str, code: i32) {
        self.on(prefix, move |_| Ok(CommandStatus::failed(code)));
    }

    /// Commands for `program` fail to start, as if it were not installed.
    pub fn missing(&self, program: &str) {
        let name = program.to_string();
        self.on(program, move |_| {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", name),
            ))
        });
    }

    /// Commands starting with `prefix` are answered by `hook`.
    ///
    /// Hooks can produce side effects, e.g. writing files a real
    /// `git clone` would have created.
    pub fn on<F>(&self, prefix: &str, hook: F)
    where
        F: Fn(&CommandSpec) -> io::Result<CommandStatus> + 'static,
    {
        self.rules
            .borrow_mut()
            .push((prefix.to_string(), Box::new(hook)));
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// All recorded invocations as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command_line()).collect()
    }

    /// Whether any recorded command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.command_line().starts_with(prefix))
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        self.calls.borrow_mut().push(spec.clone());

        let line = spec.command_line();
        let rules = self.rules.borrow();
        match rules.iter().rev().find(|(prefix, _)| line.starts_with(prefix)) {
            Some((_, hook)) => hook(spec),
            None => Ok(CommandStatus::ok()),
        }
    }
}
