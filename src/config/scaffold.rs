//! The per-run scaffolding configuration.
//!
//! [`ScaffoldConfig`] is built once from CLI arguments, environment
//! variables, and prompts, then passed by reference to every pipeline stage.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::detection::PackageManager;
use crate::registry::fetch::RetryPolicy;
use crate::registry::{TemplateRef, DEFAULT_ARCHIVE_URL};

use super::environment::Environment;

/// Database branch written to `.env` when none is given.
pub const DEFAULT_DB_BRANCH: &str = "main";

/// Credentials the generated app uses to reach Tigris.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application client id.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    /// Absolute installation target.
    pub app_path: PathBuf,
    /// Project name, the basename of `app_path`.
    pub project_name: String,
    /// Template to materialize.
    pub template: TemplateRef,
    /// Package manager used for `install`.
    pub package_manager: PackageManager,
    /// Tigris credentials.
    pub credentials: Credentials,
    /// Tigris connection URI.
    pub uri: String,
    /// Target environment.
    pub environment: Environment,
    /// Database branch.
    pub db_branch: String,
    /// Local directory holding named templates, instead of downloading them.
    pub templates_dir: Option<PathBuf>,
    /// Tarball URL for named templates.
    pub archive_url: String,
    /// Retry policy for the archive download.
    pub retry: RetryPolicy,
    /// Run the package manager after writing the manifest.
    pub install_dependencies: bool,
    /// Initialize a git repository at the end.
    pub init_git: bool,
}

impl ScaffoldConfig {
    /// Create a config with production defaults for everything not given.
    pub fn new(app_path: PathBuf, template: TemplateRef, credentials: Credentials) -> Self {
        let project_name = project_name_of(&app_path);
        let environment = Environment::default();

        Self {
            app_path,
            project_name,
            template,
            package_manager: PackageManager::Npm,
            credentials,
            uri: environment.default_uri().to_string(),
            environment,
            db_branch: DEFAULT_DB_BRANCH.to_string(),
            templates_dir: None,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            retry: RetryPolicy::default(),
            install_dependencies: true,
            init_git: true,
        }
    }
}

/// Resolve `input` against `cwd` into a normalized absolute path.
///
/// Purely lexical: the path does not have to exist. `.` components are
/// dropped and `..` pops the previous component.
pub fn resolve_app_path(cwd: &Path, input: &str) -> PathBuf {
    let joined = cwd.join(input.trim());
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    resolved
}

/// The project name for an install path: its final component.
pub fn project_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
