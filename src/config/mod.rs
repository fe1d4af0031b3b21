//! Run configuration.
//!
//! - [`scaffold`] - the [`ScaffoldConfig`] threaded through every pipeline stage
//! - [`environment`] - environment tags and their default connection URIs
//!
//! # Example
//!
//! ```
//! use create_tigris_app::config::{resolve_app_path, Credentials, ScaffoldConfig};
//! use create_tigris_app::registry::TemplateRef;
//! use std::path::Path;
//!
//! let path = resolve_app_path(Path::new("/work"), "my-app");
//! let config = ScaffoldConfig::new(
//!     path,
//!     TemplateRef::Named("default".to_string()),
//!     Credentials { client_id: "id".into(), client_secret: "secret".into() },
//! );
//! assert_eq!(config.project_name, "my-app");
//! ```

pub mod environment;
pub mod scaffold;

pub use environment::Environment;
pub use scaffold::{
    project_name_of, resolve_app_path, Credentials, ScaffoldConfig, DEFAULT_DB_BRANCH,
};
