//! Target Tigris environment selection.
//!
//! The environment tag picks the default connection URI written to `.env`
//! when no URI is supplied, and whether the generated app must use an
//! insecure (plaintext) channel.

use std::fmt;
use std::str::FromStr;

/// A Tigris deployment the generated app connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// A locally running Tigris server.
    Local,
    /// The development cloud.
    Dev,
    /// The preview cloud.
    #[default]
    Preview,
    /// The production cloud.
    Prod,
}

impl Environment {
    /// Every accepted tag, in display order.
    pub const ALL: [Environment; 4] = [Self::Local, Self::Dev, Self::Preview, Self::Prod];

    /// Resolve an optional user-supplied tag.
    ///
    /// Unset falls back to [`Environment::Preview`]. An unrecognized tag also
    /// falls back, and is returned so the caller can warn about it.
    pub fn resolve(tag: Option<&str>) -> (Self, Option<String>) {
        match tag.map(str::trim).filter(|t| !t.is_empty()) {
            None => (Self::default(), None),
            Some(t) => match t.parse() {
                Ok(env) => (env, None),
                Err(_) => (Self::default(), Some(t.to_string())),
            },
        }
    }

    /// The tag as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Preview => "preview",
            Self::Prod => "prod",
        }
    }

    /// Connection URI used when none is supplied.
    pub fn default_uri(&self) -> &'static str {
        match self {
            Self::Local => "localhost:8081",
            Self::Dev => "api.dev.tigrisdata.cloud",
            Self::Preview => "api.preview.tigrisdata.cloud",
            Self::Prod => "api.tigrisdata.cloud",
        }
    }

    /// Whether clients must connect without TLS.
    pub fn insecure_channel(&self) -> bool {
        matches!(self, Self::Local)
    }

    /// Accepted tags joined for help and warning text.
    pub fn allowed_tags() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" | "development" => Ok(Self::Dev),
            "preview" => Ok(Self::Preview),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(format!("unknown environment: {}", s)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
