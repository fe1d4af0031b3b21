//! Template references.

use std::fmt;

/// Template used when none is requested.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Where the starter files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// A template from the official catalog, by name.
    Named(String),
    /// Any Git repository, cloned as-is.
    Git(String),
}

impl TemplateRef {
    /// The template name or URL.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Git(url) => url,
        }
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `value` should be cloned with git rather than looked up by name.
pub fn is_git_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("git@")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_git_urls() {
        assert!(is_git_url("https://github.com/org/repo.git"));
        assert!(is_git_url("git@github.com:org/repo.git"));
        assert!(is_git_url("  https://example.com/repo  "));
    }

    #[test]
    fn names_are_not_git_urls() {
        assert!(!is_git_url("default"));
        assert!(!is_git_url("http://insecure.example.com/repo.git"));
        assert!(!is_git_url(""));
    }

    #[test]
    fn display_shows_name_or_url() {
        assert_eq!(TemplateRef::Named("default".into()).to_string(), "default");
        assert_eq!(
            TemplateRef::Git("git@github.com:o/r.git".into()).to_string(),
            "git@github.com:o/r.git"
        );
    }
}
