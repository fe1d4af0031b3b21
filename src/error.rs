//! Error types for scaffolding operations.
//!
//! This module defines [`ScaffoldError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - User input errors carry the remediation text the CLI prints
//! - Environment errors (permissions, missing tools, network) get distinct variants
//! - Use `anyhow::Error` (via `ScaffoldError::Other`) for unexpected errors
//! - Every variant maps to exit code 1

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scaffolding operations.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The derived project name violates npm naming restrictions.
    #[error(
        "Could not create a project called \"{name}\" because of npm naming restrictions:{}",
        bullet_list(problems)
    )]
    InvalidProjectName { name: String, problems: Vec<String> },

    /// The requested template is neither a known name nor a Git URL.
    #[error(
        "Invalid template '{name}'. Please specify one of the supported templates: {}, or a Git URL (https://... or git@...)",
        allowed.join(", ")
    )]
    InvalidTemplate { name: String, allowed: Vec<String> },

    /// The remote template catalog could not be fetched.
    #[error(
        "Could not fetch the template list from {url}: {message}\n\
         Check the template name for typos, and check your network connection or proxy settings."
    )]
    CatalogUnavailable { url: String, message: String },

    /// A required value was not supplied by flag, environment, or prompt.
    #[error("Missing required value: {name}\n{usage}")]
    MissingValue { name: String, usage: String },

    /// The installation target exists and is not empty.
    #[error("The directory {} contains files that could conflict: {}", path.display(), entries.join(", "))]
    TargetNotEmpty { path: PathBuf, entries: Vec<String> },

    /// The parent of the installation target cannot be written to.
    #[error(
        "The application path {} is not writable, please check folder permissions and try again.\n\
         It is likely you do not have write permissions for this folder.",
        path.display()
    )]
    PathNotWritable { path: PathBuf },

    /// A required external tool is not installed.
    #[error("'{tool}' is required but was not found on PATH. {hint}")]
    MissingTool { tool: String, hint: String },

    /// The template archive or directory held no files for the template.
    #[error("Template '{name}' was not found in {location}")]
    TemplateNotFound { name: String, location: String },

    /// A download failed.
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// A retried operation failed on every attempt.
    #[error("Giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// An external command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The package manifest could not be read, parsed, or written.
    #[error("Failed to update package manifest at {}: {message}", path.display())]
    ManifestError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for scaffolding operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|p| format!("\n    * {}", p)).collect()
}
