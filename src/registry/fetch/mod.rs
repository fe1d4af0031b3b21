//! Template fetching.
//!
//! Templates arrive by one of three routes: a shallow git clone, the
//! templates repository tarball, or a copy from a local directory.

pub mod archive;
pub mod git;
pub mod http;
pub mod local;
pub mod retry;

pub use archive::{extract_template, ArchiveFetcher, DEFAULT_ARCHIVE_URL};
pub use git::GitFetcher;
pub use http::{Download, HttpFetcher};
pub use local::copy_template;
pub use retry::RetryPolicy;
