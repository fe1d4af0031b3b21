//! create-tigris-app - scaffold a new Tigris application from a template.
//!
//! The tool collects a project path, credentials and a template choice,
//! then materializes a starter app: the template is cloned, downloaded or
//! copied, `package.json` is renamed and installed, `.env` is written, and
//! a git repository is initialized.
//!
//! # Modules
//!
//! - [`app`] - The scaffolding pipeline and target checks
//! - [`assets`] - Embedded text assets and `{{KEY}}` rendering
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - The per-run [`config::ScaffoldConfig`] and environment tags
//! - [`detection`] - Package manager and network detection
//! - [`env_file`] - `.env` generation
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - `package.json` rewriting, installs, name validation
//! - [`registry`] - Template resolution and fetching
//! - [`shell`] - External process execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`vcs`] - Git repository initialization
//!
//! # Example
//!
//! ```
//! use create_tigris_app::env_file::{render_env, EnvParams};
//!
//! let params = EnvParams {
//!     uri: "localhost:8081".into(),
//!     project: "my-app".into(),
//!     client_id: "id".into(),
//!     client_secret: "secret".into(),
//!     db_branch: "main".into(),
//!     insecure_channel: false,
//! };
//! let env = render_env(Some("TIGRIS_URI=[TIGRIS_URI]\n"), &params).unwrap();
//! assert!(env.starts_with("TIGRIS_URI=localhost:8081\n"));
//! ```

pub mod app;
pub mod assets;
pub mod cli;
pub mod config;
pub mod detection;
pub mod env_file;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod shell;
pub mod ui;
pub mod vcs;

pub use error::{Result, ScaffoldError};
