//! Generation of the project's `.env` file.
//!
//! Templates may ship a `.env.example` with bracket markers such as
//! `[TIGRIS_URI]`; those are filled in place. Without an example the file
//! is synthesized from an embedded asset.

pub mod installer;

pub use installer::{fill_example, install_env, render_env, EnvKey, EnvParams, ENV_FILE, EXAMPLE_FILE};
