//! Package manifest handling: project name validation, renaming the
//! template's `package.json`, and dependency installation.

pub mod package_json;
pub mod validate;

pub use package_json::{install_dependencies, write_manifest, PackageManifest, MANIFEST_FILE};
pub use validate::validate_project_name;
