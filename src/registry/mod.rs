//! Template registry.
//!
//! Resolves what the user asked for (a catalog name or a Git URL) and
//! fetches the template tree into the target directory.
//!
//! # Example
//!
//! ```
//! use create_tigris_app::registry::{resolve_template, TemplateCatalog, TemplateRef};
//!
//! let template = resolve_template(Some("default"), || {
//!     Ok(TemplateCatalog::from_names(["default"]))
//! })
//! .unwrap();
//! assert_eq!(template, TemplateRef::Named("default".into()));
//! ```

pub mod catalog;
pub mod fetch;
pub mod template;

pub use catalog::{resolve_template, TemplateCatalog, DEFAULT_CATALOG_URL};
pub use fetch::{ArchiveFetcher, Download, GitFetcher, HttpFetcher, RetryPolicy, DEFAULT_ARCHIVE_URL};
pub use template::{is_git_url, TemplateRef, DEFAULT_TEMPLATE};
