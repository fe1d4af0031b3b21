//! npm package name validation.
//!
//! Mirrors the rules npm applies to new package names. The name is
//! lowercased first, so capital letters are never reported.

use regex::Regex;
use std::sync::LazyLock;

const MAX_LENGTH: usize = 214;

const BLACKLIST: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Scoped names: `@scope/name`.
static SCOPED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@([^/]+?)/)?([^/]+?)$").expect("SCOPED_NAME must compile")
});

static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[~'!()*]").expect("SPECIAL_CHARS must compile"));

/// Whether `s` survives URI-component encoding unchanged.
fn is_uri_component_safe(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}

/// Check `name` against npm's rules for new packages.
///
/// Returns every problem found, in the order npm reports them.
pub fn validate_project_name(name: &str) -> Result<(), Vec<String>> {
    let name = name.to_lowercase();
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".to_string());
    }
    for blacklisted in BLACKLIST {
        if name == *blacklisted {
            problems.push(format!("{} is a blacklisted name", blacklisted));
        }
    }
    if CORE_MODULES.contains(&name.as_str()) {
        problems.push(format!("{} is a core module name", name));
    }
    if name.chars().count() > MAX_LENGTH {
        problems.push(format!(
            "name can no longer contain more than {} characters",
            MAX_LENGTH
        ));
    }

    let last_segment = name.rsplit('/').next().unwrap_or(&name);
    if SPECIAL_CHARS.is_match(last_segment) {
        problems.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }

    if !is_uri_component_safe(&name) {
        let scoped_ok = SCOPED_NAME.captures(&name).is_some_and(|caps| {
            let user_ok = caps.get(1).is_none_or(|u| is_uri_component_safe(u.as_str()));
            let pkg_ok = caps.get(2).is_some_and(|p| is_uri_component_safe(p.as_str()));
            user_ok && pkg_ok
        });
        if !scoped_ok {
            problems.push("name can only contain URL-friendly characters".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
