//! External process invocation.
//!
//! Every call to `git`, `hg`, or a package manager goes through the
//! [`ProcessRunner`] trait so that pipeline stages can be exercised
//! without spawning real processes.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program invocation: program, arguments, working directory, extra env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name, resolved through `PATH`.
    pub program: String,

    /// Arguments passed verbatim (no shell interpretation).
    pub args: Vec<String>,

    /// Working directory (inherits the current one when `None`).
    pub cwd: Option<PathBuf>,

    /// Environment variables added to the inherited environment.
    pub env: Vec<(String, String)>,

    /// Stream output to the terminal instead of capturing it.
    pub inherit_output: bool,
}

impl CommandSpec {
    /// Create a spec for `program` with `args`.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
            inherit_output: false,
        }
    }

    /// Run in `dir`.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Let the child write directly to the terminal.
    pub fn inherit_output(mut self) -> Self {
        self.inherit_output = true;
        self
    }

    /// The command line as a user would type it.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Exit status of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard error (empty when output was inherited).
    pub stderr: String,
}

impl CommandStatus {
    /// A zero exit status.
    pub fn ok() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    /// A non-zero exit status.
    pub fn failed(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            stderr: String::new(),
        }
    }

    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run external programs.
///
/// `Err` means the program could not be started at all (typically not
/// installed); a program that ran and failed returns `Ok` with a non-zero
/// [`CommandStatus`].
pub trait ProcessRunner {
    /// Run the command to completion.
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus>;

    /// Run the command and report only whether it succeeded.
    fn succeeds(&self, spec: &CommandSpec) -> bool {
        self.run(spec).map(|s| s.success()).unwrap_or(false)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        tracing::debug!("Running: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());

        if spec.inherit_output {
            let status = cmd
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()?;
            return Ok(CommandStatus {
                exit_code: status.code(),
                stderr: String::new(),
            });
        }

        let output = cmd.stdout(Stdio::null()).stderr(Stdio::piped()).output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!("{} exited with {:?}: {}", spec, output.status.code(), stderr.trim());
        }

        Ok(CommandStatus {
            exit_code: output.status.code(),
            stderr,
        })
    }
}
