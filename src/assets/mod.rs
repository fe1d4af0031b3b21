//! Asset templates embedded at compile time.
//!
//! Generated files (the from-scratch `.env`, the next-steps message) are
//! kept as text assets under `assets/` and rendered with [`render`], which
//! substitutes `{{KEY}}` placeholders.

use include_dir::{include_dir, Dir};

use crate::error::{Result, ScaffoldError};

/// Embedded assets directory.
static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Asset used to synthesize `.env` when a template ships no example file.
pub const ENV_TEMPLATE: &str = "env.template";

/// Asset holding the post-create instructions.
pub const NEXT_STEPS: &str = "next-steps.txt";

/// Load an embedded asset as UTF-8 text.
pub fn load(name: &str) -> Result<&'static str> {
    let file = ASSETS_DIR.get_file(name).ok_or_else(|| {
        ScaffoldError::Other(anyhow::anyhow!("Embedded asset '{}' is missing", name))
    })?;

    file.contents_utf8().ok_or_else(|| {
        ScaffoldError::Other(anyhow::anyhow!("Embedded asset '{}' is not valid UTF-8", name))
    })
}

/// Substitute `{{KEY}}` placeholders in `template`.
///
/// Single pass: substituted values are never rescanned, and unknown
/// placeholders are left untouched.
///
/// # Example
///
/// ```
/// use create_tigris_app::assets::render;
///
/// let out = render("cd {{DIR}} && {{CMD}}", &[("DIR", "my-app"), ("CMD", "npm run dev")]);
/// assert_eq!(out, "cd my-app && npm run dev");
/// ```
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Load the asset `name` and render it with `vars`.
pub fn render_asset(name: &str, vars: &[(&str, &str)]) -> Result<String> {
    Ok(render(load(name)?, vars))
}
