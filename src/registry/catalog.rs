//! The catalog of named templates, and template resolution against it.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::fetch::HttpFetcher;
use super::template::{is_git_url, TemplateRef, DEFAULT_TEMPLATE};
use crate::error::{Result, ScaffoldError};

/// GitHub contents listing of the templates directory.
pub const DEFAULT_CATALOG_URL: &str =
    "https://api.github.com/repos/tigrisdata/create-tigris-app/contents/templates";

/// One entry of a GitHub contents API listing.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// The set of template names that may be requested by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    names: Vec<String>,
}

impl TemplateCatalog {
    /// Build a catalog from known names. Order is normalized.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Load the catalog from a GitHub contents listing at `url`.
    ///
    /// Any failure, including a malformed body, is reported as
    /// [`ScaffoldError::CatalogUnavailable`].
    pub fn fetch_remote(fetcher: &HttpFetcher, url: &str) -> Result<Self> {
        let unavailable = |message: String| ScaffoldError::CatalogUnavailable {
            url: url.to_string(),
            message,
        };

        tracing::debug!("Fetching template catalog from {}", url);
        let body = fetcher
            .fetch_text(url)
            .map_err(|e| unavailable(format!("{:#}", e)))?;
        Self::parse_listing(&body).map_err(|e| unavailable(e.to_string()))
    }

    /// Parse a contents listing, keeping directories only.
    pub fn parse_listing(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<ContentEntry> = serde_json::from_str(json)?;
        Ok(Self::from_names(
            entries
                .into_iter()
                .filter(|e| e.kind == "dir")
                .map(|e| e.name),
        ))
    }

    /// Load the catalog from the subdirectories of `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(Self::from_names(names))
    }

    /// Whether `name` is a known template.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Known template names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the catalog lists nothing.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolve user input to a template reference.
///
/// Git URLs are accepted without consulting the catalog, so
/// `load_catalog` only runs for named templates.
pub fn resolve_template<F>(input: Option<&str>, load_catalog: F) -> Result<TemplateRef>
where
    F: FnOnce() -> Result<TemplateCatalog>,
{
    let input = input.map(str::trim).filter(|s| !s.is_empty());

    if let Some(value) = input {
        if is_git_url(value) {
            return Ok(TemplateRef::Git(value.to_string()));
        }
    }

    let name = input.unwrap_or(DEFAULT_TEMPLATE);
    let catalog = load_catalog()?;

    if catalog.contains(name) {
        Ok(TemplateRef::Named(name.to_string()))
    } else {
        Err(ScaffoldError::InvalidTemplate {
            name: name.to_string(),
            allowed: catalog.names().to_vec(),
        })
    }
}
