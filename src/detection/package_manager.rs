//! Package manager selection.

use std::fmt;
use std::path::Path;

use crate::shell::CommandSpec;

/// A Node.js package manager the generated project can be installed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Detect the package manager that launched this tool.
    ///
    /// `npx`, `pnpm dlx`, and `yarn create` all set `npm_config_user_agent`.
    pub fn detect() -> Self {
        Self::from_user_agent(std::env::var("npm_config_user_agent").ok().as_deref())
    }

    /// Pick a package manager from an npm user-agent string.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if ua.starts_with("yarn") => Self::Yarn,
            Some(ua) if ua.starts_with("pnpm") => Self::Pnpm,
            _ => Self::Npm,
        }
    }

    /// Executable name.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Non-interactive install of the manifest's dependencies in `root`.
    ///
    /// `online` only matters for yarn, which can install from its offline
    /// mirror.
    pub fn install_command(&self, root: &Path, online: bool) -> CommandSpec {
        let args: Vec<&str> = match self {
            Self::Npm => vec!["install", "--no-audit", "--no-fund"],
            Self::Pnpm => vec!["install"],
            Self::Yarn if online => vec!["install", "--non-interactive"],
            Self::Yarn => vec!["install", "--non-interactive", "--offline"],
        };

        CommandSpec::new(self.binary(), args)
            .in_dir(root)
            .with_env("ADBLOCK", "1")
            .with_env("DISABLE_OPENCOLLECTIVE", "1")
            .inherit_output()
    }

    /// How a user runs `script` from the project directory.
    pub fn run_script(&self, script: &str) -> String {
        match (self, script) {
            (Self::Yarn, _) => format!("yarn {}", script),
            (_, "start") => format!("{} start", self.binary()),
            _ => format!("{} run {}", self.binary(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}
