//! Host environment detection: which package manager to use, and whether
//! the package registry is reachable.

pub mod online;
pub mod package_manager;

pub use online::is_online;
pub use package_manager::PackageManager;
