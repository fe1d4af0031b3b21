//! Reading, renaming and writing `package.json`.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::PackageManager;
use crate::error::{Result, ScaffoldError};
use crate::shell::ProcessRunner;

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// A parsed `package.json`. Key order is preserved on save.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Load the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let error = |message: String| ScaffoldError::ManifestError {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| error(e.to_string()))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| error(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self {
                path: path.to_path_buf(),
                fields,
            }),
            _ => Err(error("expected a JSON object".to_string())),
        }
    }

    /// Overwrite the package name.
    pub fn set_name(&mut self, name: &str) {
        self.fields
            .insert("name".to_string(), Value::String(name.to_string()));
    }

    /// Runtime dependencies as `(name, version)` pairs.
    pub fn dependencies(&self) -> Vec<(String, String)> {
        match self.fields.get("dependencies") {
            Some(Value::Object(deps)) => deps
                .iter()
                .map(|(name, version)| {
                    let version = version
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| version.to_string());
                    (name.clone(), version)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether either dependency table is declared.
    pub fn has_dependencies(&self) -> bool {
        self.fields.contains_key("dependencies") || self.fields.contains_key("devDependencies")
    }

    /// Whether `scripts.<name>` is declared.
    pub fn has_script(&self, name: &str) -> bool {
        self.fields
            .get("scripts")
            .and_then(Value::as_object)
            .is_some_and(|scripts| scripts.contains_key(name))
    }

    /// Serialize with 2-space indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.fields).map_err(|e| {
            ScaffoldError::ManifestError {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        out.push('\n');
        Ok(out)
    }

    /// Write back to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        let content = self.to_pretty_string()?;
        fs::write(&self.path, content).map_err(|e| ScaffoldError::ManifestError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// Rename the manifest in `root` to `project_name`.
///
/// Returns `None` when the template ships no manifest.
pub fn write_manifest(root: &Path, project_name: &str) -> Result<Option<PackageManifest>> {
    let path = root.join(MANIFEST_FILE);
    if !path.exists() {
        tracing::debug!("No {} in {}", MANIFEST_FILE, root.display());
        return Ok(None);
    }

    let mut manifest = PackageManifest::load(&path)?;
    manifest.set_name(project_name);
    manifest.save()?;
    tracing::debug!("Set package name to {}", project_name);
    Ok(Some(manifest))
}

/// Run the package manager's install in `root`.
pub fn install_dependencies(
    runner: &dyn ProcessRunner,
    package_manager: PackageManager,
    root: &Path,
    online: bool,
) -> Result<()> {
    let spec = package_manager.install_command(root, online);
    tracing::debug!("Running {} in {}", spec, root.display());

    let status = runner.run(&spec).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScaffoldError::MissingTool {
                tool: package_manager.binary().to_string(),
                hint: "Install it or choose another package manager with --use-npm, --use-pnpm or --use-yarn.".to_string(),
            }
        } else {
            ScaffoldError::Io(e)
        }
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ScaffoldError::CommandFailed {
            command: spec.command_line(),
            code: status.exit_code,
        })
    }
}
