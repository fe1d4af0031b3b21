//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Running without a
//! subcommand creates an app from the flattened [`CreateArgs`].

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::DEFAULT_DB_BRANCH;
use crate::detection::PackageManager;
use crate::registry::{DEFAULT_ARCHIVE_URL, DEFAULT_CATALOG_URL};

/// Create a new Tigris application from a template.
#[derive(Debug, Parser)]
#[command(name = "create-tigris-app")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub create: CreateArgs,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for creating an app.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateArgs {
    /// Directory to create the project in; its name becomes the package name
    #[arg(short, long, value_name = "PROJECT_DIRECTORY")]
    pub project: Option<String>,

    /// Template name, or a Git URL (https://... or git@...)
    #[arg(short, long, value_name = "NAME_OR_URL")]
    pub example: Option<String>,

    /// Tigris application client id
    #[arg(short = 'i', long, env = "TIGRIS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Tigris application client secret
    #[arg(short = 's', long, env = "TIGRIS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Tigris server URI (defaults to the environment's URI)
    #[arg(short, long, env = "TIGRIS_URI")]
    pub uri: Option<String>,

    /// Target environment: local, dev, preview, prod
    #[arg(long = "env", value_name = "ENV", env = "TIGRIS_ENV")]
    pub environment: Option<String>,

    /// Database branch written to .env
    #[arg(long, default_value = DEFAULT_DB_BRANCH)]
    pub db_branch: String,

    /// Bootstrap the app using npm
    #[arg(long, conflicts_with_all = ["use_pnpm", "use_yarn"])]
    pub use_npm: bool,

    /// Bootstrap the app using pnpm
    #[arg(long, conflicts_with = "use_yarn")]
    pub use_pnpm: bool,

    /// Bootstrap the app using yarn
    #[arg(long)]
    pub use_yarn: bool,

    /// Copy named templates from this directory instead of downloading them
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Template catalog endpoint
    #[arg(long, hide = true, env = "CREATE_TIGRIS_APP_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Template archive endpoint
    #[arg(long, hide = true, env = "CREATE_TIGRIS_APP_ARCHIVE_URL", default_value = DEFAULT_ARCHIVE_URL)]
    pub archive_url: String,

    /// Skip installing dependencies
    #[arg(long)]
    pub no_install: bool,

    /// Skip initializing a git repository
    #[arg(long)]
    pub no_git: bool,

    /// Never prompt; fail when a required value is missing
    #[arg(long)]
    pub non_interactive: bool,
}

impl CreateArgs {
    /// The package manager selected by flag, else the one that launched us.
    pub fn package_manager(&self) -> PackageManager {
        if self.use_npm {
            PackageManager::Npm
        } else if self.use_pnpm {
            PackageManager::Pnpm
        } else if self.use_yarn {
            PackageManager::Yarn
        } else {
            PackageManager::detect()
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
