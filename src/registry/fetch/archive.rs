//! Template download from the templates repository tarball.
//!
//! The whole repository is downloaded as one `.tar.gz`; only the entries
//! under `templates/<name>/` are extracted, with the leading path
//! components stripped so the template's root lands in the target.

use anyhow::{bail, Context};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use super::http::Download;
use super::retry::RetryPolicy;
use crate::error::{Result, ScaffoldError};

/// Tarball of the templates repository's `main` branch.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://codeload.github.com/tigrisdata/create-tigris-app/tar.gz/main";

/// Top-level directory inside the tarball.
pub const ARCHIVE_ROOT: &str = "create-tigris-app-main";

/// Leading components dropped from each extracted path
/// (`<root>/templates/<name>/`).
pub const STRIP_COMPONENTS: usize = 3;

/// Downloads the templates tarball and extracts one template from it.
pub struct ArchiveFetcher<'a> {
    downloader: &'a dyn Download,
    url: String,
    retry: RetryPolicy,
}

impl<'a> ArchiveFetcher<'a> {
    /// Create a fetcher for the tarball at `url`.
    pub fn new(downloader: &'a dyn Download, url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            downloader,
            url: url.into(),
            retry,
        }
    }

    /// Get the archive URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and extract template `name` into `root`.
    ///
    /// Retried as a whole according to the retry policy. Returns the
    /// number of files written.
    pub fn install(&self, name: &str, root: &Path) -> Result<usize> {
        self.retry.run(|attempt| {
            tracing::debug!("Downloading {} (attempt {})", self.url, attempt);
            self.download_and_extract(name, root)
        })
    }

    fn download_and_extract(&self, name: &str, root: &Path) -> anyhow::Result<usize> {
        let mut temp = tempfile::Builder::new()
            .prefix("create-tigris-app.temp-")
            .tempfile()
            .context("Failed to create temporary file")?;

        let bytes = self.downloader.download(&self.url, temp.as_file_mut())?;
        tracing::debug!("Downloaded {} bytes to {}", bytes, temp.path().display());

        let file = temp.as_file_mut();
        file.flush()?;
        file.seek(SeekFrom::Start(0))?;

        let written = extract_template(&mut *file, name, root)?;
        temp.close().context("Failed to delete temporary file")?;

        if written == 0 {
            bail!(ScaffoldError::TemplateNotFound {
                name: name.to_string(),
                location: self.url.clone(),
            });
        }

        Ok(written)
    }
}

/// Extract the entries of template `name` from a gzipped tarball into `root`.
///
/// Entries whose stripped path is not a plain relative path are skipped, as
/// are links pointing outside the template and entries that would land
/// outside `root` through an already-extracted link. Returns the number of
/// regular files written.
pub fn extract_template<R: Read>(reader: R, name: &str, root: &Path) -> anyhow::Result<usize> {
    let prefix = Path::new(ARCHIVE_ROOT).join("templates").join(name);
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let mut written = 0;

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create {}", root.display()))?;
    let base = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    for entry in archive.entries().context("Failed to read archive")? {
        let mut entry = entry.context("Corrupt archive entry")?;
        let path = entry.path()?.into_owned();

        if !path.starts_with(&prefix) {
            continue;
        }

        let Some(relative) = strip_components(&path, STRIP_COMPONENTS) else {
            continue;
        };

        if !safe_link(&entry)? {
            tracing::warn!("Skipping archive link {} leaving the template", path.display());
            continue;
        }

        let dest = root.join(&relative);
        if !stays_within(&base, &dest)? {
            tracing::warn!("Skipping archive entry {} outside the target", path.display());
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        entry
            .unpack(&dest)
            .with_context(|| format!("Failed to extract {}", relative.display()))?;

        if entry.header().entry_type().is_file() {
            written += 1;
        }
    }

    Ok(written)
}

/// Drop the first `n` components of `path`.
///
/// Returns `None` when nothing is left or the remainder could escape the
/// destination (`..`, absolute, or prefixed components).
fn strip_components(path: &Path, n: usize) -> Option<PathBuf> {
    let mut rest = PathBuf::new();

    for component in path.components().skip(n) {
        match component {
            Component::Normal(part) => rest.push(part),
            Component::CurDir => {}
            _ => {
                tracing::warn!("Skipping unsafe archive entry {}", path.display());
                return None;
            }
        }
    }

    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Symlinks must point at a relative path without `..`. Hard links are
/// never extracted.
fn safe_link<R: Read>(entry: &tar::Entry<'_, R>) -> anyhow::Result<bool> {
    match entry.header().entry_type() {
        tar::EntryType::Link => Ok(false),
        tar::EntryType::Symlink => {
            let Some(target) = entry.link_name()? else {
                return Ok(false);
            };
            Ok(target
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir)))
        }
        _ => Ok(true),
    }
}

/// Whether the deepest existing ancestor of `dest` resolves inside `base`.
fn stays_within(base: &Path, dest: &Path) -> anyhow::Result<bool> {
    let mut current = dest.parent();

    while let Some(dir) = current {
        if dir.symlink_metadata().is_ok() {
            return match dir.canonicalize() {
                Ok(resolved) => Ok(resolved.starts_with(base)),
                // Dangling link.
                Err(_) => Ok(false),
            };
        }
        current = dir.parent();
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Build a `.tar.gz` holding `files` (path, content).
    fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    fn repo_tarball() -> Vec<u8> {
        tarball(&[
            ("create-tigris-app-main/README.md", "repo readme"),
            (
                "create-tigris-app-main/templates/default/package.json",
                "{\"name\": \"default\"}",
            ),
            (
                "create-tigris-app-main/templates/default/src/index.ts",
                "console.log('hi');",
            ),
            (
                "create-tigris-app-main/templates/rest-express/package.json",
                "{\"name\": \"rest-express\"}",
            ),
        ])
    }

    /// Fails a fixed number of times, then serves `payload`.
    struct FlakyDownloader {
        failures_left: Cell<u32>,
        calls: Cell<u32>,
        payload: Vec<u8>,
    }

    impl FlakyDownloader {
        fn new(failures: u32, payload: Vec<u8>) -> Self {
            Self {
                failures_left: Cell::new(failures),
                calls: Cell::new(0),
                payload,
            }
        }
    }

    impl Download for FlakyDownloader {
        fn download(&self, _url: &str, dest: &mut dyn Write) -> anyhow::Result<u64> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(anyhow!("connection reset by peer"));
            }
            dest.write_all(&self.payload)?;
            Ok(self.payload.len() as u64)
        }
    }

    #[test]
    fn extracts_only_requested_template() {
        let temp = TempDir::new().unwrap();
        let written = extract_template(&repo_tarball()[..], "default", temp.path()).unwrap();

        assert_eq!(written, 2);
        assert!(temp.path().join("package.json").exists());
        assert!(temp.path().join("src/index.ts").exists());
        assert!(!temp.path().join("README.md").exists());
        assert!(!temp.path().join("templates").exists());

        let manifest = fs::read_to_string(temp.path().join("package.json")).unwrap();
        assert!(manifest.contains("\"default\""));
    }

    #[test]
    fn template_name_must_match_whole_component() {
        let temp = TempDir::new().unwrap();
        let written = extract_template(&repo_tarball()[..], "rest", temp.path()).unwrap();

        assert_eq!(written, 0);
    }

    #[test]
    fn strip_components_rejects_escapes() {
        assert_eq!(
            strip_components(Path::new("a/b/c/d/e.txt"), 3),
            Some(PathBuf::from("d/e.txt"))
        );
        assert_eq!(strip_components(Path::new("a/b/c"), 3), None);
        assert_eq!(strip_components(Path::new("a/b/c/../x"), 3), None);
    }

    /// A `.tar.gz` with a symlink `link -> target` followed by `link/evil.txt`.
    #[cfg(unix)]
    fn symlink_tarball(target: &Path) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

        let mut link = tar::Header::new_gnu();
        link.set_entry_type(tar::EntryType::Symlink);
        link.set_size(0);
        link.set_mode(0o777);
        builder
            .append_link(&mut link, "create-tigris-app-main/templates/default/link", target)
            .unwrap();

        let content = "owned";
        let mut file = tar::Header::new_gnu();
        file.set_size(content.len() as u64);
        file.set_mode(0o644);
        file.set_cksum();
        builder
            .append_data(
                &mut file,
                "create-tigris-app-main/templates/default/link/evil.txt",
                content.as_bytes(),
            )
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn absolute_symlink_does_not_redirect_writes() {
        let outside = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();

        let written =
            extract_template(&symlink_tarball(outside.path())[..], "default", temp.path()).unwrap();

        assert!(!outside.path().join("evil.txt").exists());
        assert!(!temp.path().join("link").is_symlink());
        assert_eq!(written, 1);
        assert!(temp.path().join("link/evil.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn parent_relative_symlink_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app");

        extract_template(&symlink_tarball(Path::new("../"))[..], "default", &root).unwrap();

        assert!(!temp.path().join("evil.txt").exists());
        assert!(!root.join("link").is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn existing_link_out_of_target_is_not_followed() {
        let outside = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();
        let payload = tarball(&[(
            "create-tigris-app-main/templates/default/link/evil.txt",
            "owned",
        )]);

        let written = extract_template(&payload[..], "default", temp.path()).unwrap();

        assert_eq!(written, 0);
        assert!(!outside.path().join("evil.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn relative_symlink_inside_template_is_kept() {
        let temp = TempDir::new().unwrap();

        extract_template(&symlink_tarball(Path::new("real"))[..], "default", temp.path()).unwrap();

        assert!(temp.path().join("link").is_symlink());
    }

    #[test]
    fn install_succeeds_after_two_transient_failures() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(2, repo_tarball());
        let fetcher = ArchiveFetcher::new(&downloader, "http://example.test/main", RetryPolicy::immediate(3));

        let written = fetcher.install("default", temp.path()).unwrap();

        assert_eq!(downloader.calls.get(), 3);
        assert_eq!(written, 2);
        assert!(temp.path().join("package.json").exists());
        assert!(temp.path().join("src/index.ts").exists());
    }

    #[test]
    fn install_gives_up_after_three_failures() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(3, repo_tarball());
        let fetcher = ArchiveFetcher::new(&downloader, "http://example.test/main", RetryPolicy::immediate(3));

        let err = fetcher.install("default", temp.path()).unwrap_err();

        assert_eq!(downloader.calls.get(), 3);
        assert!(matches!(err, ScaffoldError::RetriesExhausted { attempts: 3, .. }));
        assert!(!temp.path().join("package.json").exists());
    }

    #[test]
    fn unknown_template_reports_not_found() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(0, repo_tarball());
        let fetcher = ArchiveFetcher::new(&downloader, "http://example.test/main", RetryPolicy::immediate(1));

        let err = fetcher.install("nextjs", temp.path()).unwrap_err();

        assert!(err.to_string().contains("Template 'nextjs' was not found"));
    }

    #[test]
    fn default_url_points_at_main_branch() {
        let downloader = FlakyDownloader::new(0, Vec::new());
        let fetcher = ArchiveFetcher::new(&downloader, DEFAULT_ARCHIVE_URL, RetryPolicy::default());
        assert!(fetcher.url().ends_with("/tar.gz/main"));
    }
}
