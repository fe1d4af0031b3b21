//! Template copy from a local templates directory.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, ScaffoldError};

/// Name a template file should have once installed.
///
/// Dotfiles are stored without the leading dot so that they survive
/// packaging.
pub fn installed_name(name: &str) -> &str {
    match name {
        "gitignore" => ".gitignore",
        "eslintrc.json" => ".eslintrc.json",
        "README-template.md" => "README.md",
        other => other,
    }
}

/// Copy `<templates_dir>/<name>/**` into `root`.
///
/// Returns the number of files copied.
pub fn copy_template(templates_dir: &Path, name: &str, root: &Path) -> Result<usize> {
    let source = templates_dir.join(name);
    if !source.is_dir() {
        return Err(ScaffoldError::TemplateNotFound {
            name: name.to_string(),
            location: templates_dir.display().to_string(),
        });
    }

    fs::create_dir_all(root)?;
    let copied = copy_tree(&source, root)?;
    tracing::debug!("Copied {} files from {}", copied, source.display());
    Ok(copied)
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    let mut copied = 0;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let target_name = match file_name.to_str() {
            Some(name) => installed_name(name).to_string(),
            None => file_name.to_string_lossy().into_owned(),
        };
        let target = to.join(target_name);

        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target)?;
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
