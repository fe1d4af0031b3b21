use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::assets::{self, ENV_TEMPLATE};
use crate::error::Result;

/// Example file shipped by templates.
pub const EXAMPLE_FILE: &str = ".env.example";

/// Generated file.
pub const ENV_FILE: &str = ".env";

/// A variable the generated `.env` may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKey {
    Uri,
    Project,
    ClientId,
    ClientSecret,
    DbBranch,
    /// Only written for the `local` environment.
    InsecureChannel,
}

impl EnvKey {
    /// The fixed key set, in file order.
    pub const REQUIRED: [EnvKey; 5] = [
        EnvKey::Uri,
        EnvKey::Project,
        EnvKey::ClientId,
        EnvKey::ClientSecret,
        EnvKey::DbBranch,
    ];

    /// Variable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uri => "TIGRIS_URI",
            Self::Project => "TIGRIS_PROJECT",
            Self::ClientId => "TIGRIS_CLIENT_ID",
            Self::ClientSecret => "TIGRIS_CLIENT_SECRET",
            Self::DbBranch => "TIGRIS_DB_BRANCH",
            Self::InsecureChannel => "TIGRIS_INSECURE_CHANNEL",
        }
    }

    /// Placeholder marker in an example file, e.g. `[TIGRIS_URI]`.
    pub fn marker(&self) -> String {
        format!("[{}]", self.name())
    }
}

/// Values written to `.env`.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvParams {
    pub uri: String,
    pub project: String,
    pub client_id: String,
    pub client_secret: String,
    pub db_branch: String,
    pub insecure_channel: bool,
}

impl EnvParams {
    /// Value for `key`.
    pub fn value(&self, key: EnvKey) -> &str {
        match key {
            EnvKey::Uri => &self.uri,
            EnvKey::Project => &self.project,
            EnvKey::ClientId => &self.client_id,
            EnvKey::ClientSecret => &self.client_secret,
            EnvKey::DbBranch => &self.db_branch,
            EnvKey::InsecureChannel => {
                if self.insecure_channel {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }

    /// Keys to write: the fixed five, plus the insecure flag when set.
    fn keys(&self) -> Vec<EnvKey> {
        let mut keys = EnvKey::REQUIRED.to_vec();
        if self.insecure_channel {
            keys.push(EnvKey::InsecureChannel);
        }
        keys
    }
}

impl fmt::Debug for EnvParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvParams")
            .field("uri", &self.uri)
            .field("project", &self.project)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("db_branch", &self.db_branch)
            .field("insecure_channel", &self.insecure_channel)
            .finish()
    }
}

/// Fill the markers in an example file.
///
/// For each key, the first occurrence of its marker in `example` is
/// replaced; keys without a marker are appended as `KEY=value` lines using
/// the example's line terminator.
/// Markers are located in the original text, so values that happen to
/// contain marker text are never substituted again.
pub fn fill_example(example: &str, params: &EnvParams) -> String {
    let mut replacements: Vec<(usize, usize, &str)> = Vec::new();
    let mut appended: Vec<EnvKey> = Vec::new();

    for key in params.keys() {
        let marker = key.marker();
        match example.find(&marker) {
            Some(pos) => replacements.push((pos, marker.len(), params.value(key))),
            None => appended.push(key),
        }
    }
    replacements.sort_by_key(|(pos, _, _)| *pos);

    let mut out = String::with_capacity(example.len() + 64);
    let mut cursor = 0;
    for (pos, len, value) in replacements {
        out.push_str(&example[cursor..pos]);
        out.push_str(value);
        cursor = pos + len;
    }
    out.push_str(&example[cursor..]);

    let eol = if example.contains("\r\n") { "\r\n" } else { "\n" };
    for key in appended {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }
        out.push_str(key.name());
        out.push('=');
        out.push_str(params.value(key));
        out.push_str(eol);
    }

    if !out.ends_with('\n') {
        out.push_str(eol);
    }
    out
}

/// Produce the `.env` content, from `example` when present.
pub fn render_env(example: Option<&str>, params: &EnvParams) -> Result<String> {
    if let Some(example) = example {
        return Ok(fill_example(example, params));
    }

    let vars: Vec<(&str, &str)> = EnvKey::REQUIRED
        .iter()
        .map(|key| (key.name(), params.value(*key)))
        .collect();
    let mut out = assets::render_asset(ENV_TEMPLATE, &vars)?;

    if !out.ends_with('\n') {
        out.push('\n');
    }
    if params.insecure_channel {
        out.push_str(EnvKey::InsecureChannel.name());
        out.push_str("=true\n");
    }
    Ok(out)
}

/// Write `root/.env`, filling `root/.env.example` if the template has one.
pub fn install_env(root: &Path, params: &EnvParams) -> Result<PathBuf> {
    let example_path = root.join(EXAMPLE_FILE);
    let example = match fs::read_to_string(&example_path) {
        Ok(content) => {
            tracing::debug!("Filling {}", example_path.display());
            Some(content)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let content = render_env(example.as_deref(), params)?;
    let path = root.join(ENV_FILE);
    fs::write(&path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}
