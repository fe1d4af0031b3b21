//! Installation target checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

/// Whether files can be created in `dir`.
pub fn is_writable(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".create-tigris-app-probe-")
        .tempfile_in(dir)
        .is_ok()
}

/// The closest ancestor of `path` that exists.
fn existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .skip(1)
        .find(|p| p.is_dir())
        .map(Path::to_path_buf)
}

/// Entries of `dir`, sorted. Empty when `dir` does not exist.
fn entries_of(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    names.sort();
    Ok(names)
}

/// Check that `root` can be created and is empty or absent.
///
/// Nothing is written to disk.
pub fn check_target(root: &Path) -> Result<()> {
    if root.exists() && !root.is_dir() {
        return Err(ScaffoldError::TargetNotEmpty {
            path: root.to_path_buf(),
            entries: vec![format!(
                "{} (a file, not a directory)",
                root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
            )],
        });
    }

    let writable_probe = if root.is_dir() {
        Some(root.to_path_buf())
    } else {
        existing_ancestor(root)
    };
    match writable_probe {
        Some(dir) if is_writable(&dir) => {}
        _ => {
            return Err(ScaffoldError::PathNotWritable {
                path: root.parent().unwrap_or(root).to_path_buf(),
            })
        }
    }

    let entries = entries_of(root)?;
    if !entries.is_empty() {
        return Err(ScaffoldError::TargetNotEmpty {
            path: root.to_path_buf(),
            entries,
        });
    }

    Ok(())
}

/// Check `root`, then create it.
pub fn prepare_target(root: &Path) -> Result<()> {
    check_target(root)?;
    fs::create_dir_all(root)?;
    tracing::debug!("Prepared {}", root.display());
    Ok(())
}

/// The path to show in the `cd` hint: just the name when `root` sits
/// directly in `cwd`, otherwise the full path.
pub fn cd_path(cwd: Option<&Path>, root: &Path) -> String {
    match (cwd, root.parent(), root.file_name()) {
        (Some(cwd), Some(parent), Some(name)) if parent == cwd => {
            name.to_string_lossy().into_owned()
        }
        _ => root.display().to_string(),
    }
}
