//! Git repository initialization for the new project.
//!
//! Best effort: every failure is reported as an outcome rather than an
//! error, and a partially created repository is removed.

use std::fmt;
use std::io;
use std::path::Path;

use crate::shell::{CommandSpec, ProcessRunner};

/// Branch created for the initial commit.
pub const INITIAL_BRANCH: &str = "main";

/// Message of the initial commit.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit from Create Tigris App";

/// What happened when initializing the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitInitOutcome {
    /// A repository was created with an initial commit.
    Initialized,
    /// The target is already inside a git or Mercurial working tree.
    AlreadyVersioned,
    /// No usable `git` on `PATH`.
    GitMissing,
    /// A step failed; any partial `.git` has been removed.
    Failed { step: String },
}

impl GitInitOutcome {
    /// Whether a repository was created.
    pub fn initialized(&self) -> bool {
        matches!(self, Self::Initialized)
    }
}

impl fmt::Display for GitInitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized => write!(f, "Initialized a git repository."),
            Self::AlreadyVersioned => {
                write!(f, "Skipped git init: already inside a repository.")
            }
            Self::GitMissing => write!(f, "Skipped git init: git is not installed."),
            Self::Failed { step } => write!(f, "Skipped git init: '{}' failed.", step),
        }
    }
}

/// Initializes a git repository in a project directory.
pub struct GitInitializer<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> GitInitializer<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    fn git(&self, root: &Path, args: &[&str]) -> CommandSpec {
        CommandSpec::new("git", args.iter().copied()).in_dir(root)
    }

    /// Whether `root` is already under version control.
    pub fn is_versioned(&self, root: &Path) -> bool {
        self.runner
            .succeeds(&self.git(root, &["rev-parse", "--is-inside-work-tree"]))
            || self
                .runner
                .succeeds(&CommandSpec::new("hg", ["--cwd", ".", "root"]).in_dir(root))
    }

    /// Create a repository on `main` with every file committed.
    pub fn initialize(&self, root: &Path) -> GitInitOutcome {
        if !self.runner.succeeds(&self.git(root, &["--version"])) {
            return GitInitOutcome::GitMissing;
        }
        if self.is_versioned(root) {
            tracing::debug!("{} is already versioned", root.display());
            return GitInitOutcome::AlreadyVersioned;
        }

        let init = self.git(root, &["init"]);
        if !self.runner.succeeds(&init) {
            return GitInitOutcome::Failed {
                step: init.command_line(),
            };
        }

        let steps = [
            self.git(root, &["checkout", "-b", INITIAL_BRANCH]),
            self.git(root, &["add", "-A"]),
            self.git(root, &["commit", "-m", INITIAL_COMMIT_MESSAGE]),
        ];

        for step in &steps {
            if !self.runner.succeeds(step) {
                tracing::warn!("{} failed, removing partial repository", step);
                if let Err(e) = remove_repository(root) {
                    tracing::warn!("Could not remove {}: {}", root.join(".git").display(), e);
                }
                return GitInitOutcome::Failed {
                    step: step.command_line(),
                };
            }
        }

        GitInitOutcome::Initialized
    }
}

/// Delete `root/.git` if present.
pub fn remove_repository(root: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(root.join(".git")) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
