//! Git template fetching.
//!
//! Shallow-clones an arbitrary repository into the target directory and
//! strips its history so the project starts fresh.

use std::path::Path;

use crate::error::{Result, ScaffoldError};
use crate::shell::{CommandSpec, ProcessRunner};

/// Clones templates from git repositories.
pub struct GitFetcher<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> GitFetcher<'a> {
    /// Create a new git fetcher.
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    /// Check whether a git client is available.
    pub fn is_installed(&self) -> bool {
        self.runner.succeeds(&CommandSpec::new("git", ["--version"]))
    }

    /// Clone `url` with depth 1 into `root`, then remove the cloned `.git`.
    pub fn clone_shallow(&self, url: &str, root: &Path) -> Result<()> {
        if !self.is_installed() {
            return Err(ScaffoldError::MissingTool {
                tool: "git".to_string(),
                hint: "Install git to use a Git URL as the template.".to_string(),
            });
        }

        let spec = CommandSpec::new(
            "git",
            [
                "clone".to_string(),
                "--depth=1".to_string(),
                url.to_string(),
                root.to_string_lossy().into_owned(),
            ],
        )
        .inherit_output();

        tracing::debug!("Running {}", spec);
        let status = self.runner.run(&spec)?;
        if !status.success() {
            if !status.stderr.is_empty() {
                tracing::debug!("git clone stderr: {}", status.stderr.trim());
            }
            return Err(ScaffoldError::CommandFailed {
                command: spec.command_line(),
                code: status.exit_code,
            });
        }

        crate::vcs::remove_repository(root)?;
        tracing::debug!("Removed cloned history from {}", root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandStatus, RecordingRunner};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fake_clone(runner: &RecordingRunner) {
        runner.on("git clone", |spec| {
            let root = PathBuf::from(spec.args.last().unwrap());
            fs::create_dir_all(root.join(".git/objects")).unwrap();
            fs::write(root.join("package.json"), "{}").unwrap();
            Ok(CommandStatus::ok())
        });
    }

    #[test]
    fn clones_shallow_and_strips_history() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app");
        let runner = RecordingRunner::new();
        fake_clone(&runner);

        GitFetcher::new(&runner)
            .clone_shallow("https://github.com/org/repo.git", &root)
            .unwrap();

        let lines = runner.command_lines();
        assert_eq!(lines[0], "git --version");
        assert_eq!(
            lines[1],
            format!(
                "git clone --depth=1 https://github.com/org/repo.git {}",
                root.display()
            )
        );
        assert!(root.join("package.json").exists());
        assert!(!root.join(".git").exists());
    }

    #[test]
    fn missing_git_fails_fast() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        runner.missing("git");

        let err = GitFetcher::new(&runner)
            .clone_shallow("git@github.com:org/repo.git", temp.path())
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::MissingTool { ref tool, .. } if tool == "git"));
        assert!(!runner.ran("git clone"));
    }

    #[test]
    fn failed_clone_reports_command() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        runner.fail("git clone", 128);

        let err = GitFetcher::new(&runner)
            .clone_shallow("https://github.com/org/missing.git", temp.path())
            .unwrap_err();

        match err {
            ScaffoldError::CommandFailed { command, code } => {
                assert!(command.starts_with("git clone --depth=1"));
                assert_eq!(code, Some(128));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clone_is_not_retried() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        runner.fail("git clone", 1);

        let _ = GitFetcher::new(&runner).clone_shallow("https://x.test/r.git", temp.path());

        let clones = runner
            .command_lines()
            .into_iter()
            .filter(|l| l.starts_with("git clone"))
            .count();
        assert_eq!(clones, 1);
    }
}
