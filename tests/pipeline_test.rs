//! Integration tests for the scaffolding pipeline public API.

use create_tigris_app::app::{create_app, Services};
use create_tigris_app::config::{Credentials, ScaffoldConfig};
use create_tigris_app::env_file::{install_env, EnvParams};
use create_tigris_app::registry::{Download, HttpFetcher, RetryPolicy, TemplateRef};
use create_tigris_app::shell::RecordingRunner;
use create_tigris_app::ui::MockUI;
use create_tigris_app::vcs::GitInitOutcome;
use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn tarball() -> Vec<u8> {
    let files = [
        (
            "create-tigris-app-main/templates/default/package.json",
            "{\"name\": \"default\", \"scripts\": {\"dev\": \"next dev\"}}",
        ),
        ("create-tigris-app-main/templates/default/README-template.md", "# app\n"),
        ("create-tigris-app-main/templates/default/lib/db.ts", "export {};\n"),
    ];

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Fails the first `failures` downloads, then delegates to HTTP.
struct Flaky {
    http: HttpFetcher,
    failures: u32,
    calls: Cell<u32>,
}

impl Download for Flaky {
    fn download(&self, url: &str, dest: &mut dyn Write) -> anyhow::Result<u64> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call <= self.failures {
            anyhow::bail!("connection reset (attempt {})", call);
        }
        self.http.download(url, dest)
    }
}

fn config(root: PathBuf, archive_url: String) -> ScaffoldConfig {
    let mut config = ScaffoldConfig::new(
        root,
        TemplateRef::Named("default".into()),
        Credentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        },
    );
    config.archive_url = archive_url;
    config.retry = RetryPolicy::immediate(3);
    config
}

/// Runner for a directory outside any repository.
fn fresh_runner() -> RecordingRunner {
    let runner = RecordingRunner::new();
    runner.fail("git rev-parse", 128);
    runner.fail("hg", 255);
    runner
}

#[test]
fn archive_recovers_after_two_failures() {
    let server = MockServer::start();
    let archive = server.mock(|when, then| {
        when.method(GET).path("/main.tar.gz");
        then.status(200).body(tarball());
    });
    let out = TempDir::new().unwrap();
    let root = out.path().join("recovered");
    let downloader = Flaky {
        http: HttpFetcher::new().unwrap(),
        failures: 2,
        calls: Cell::new(0),
    };
    let runner = fresh_runner();
    let mut ui = MockUI::new();

    let outcome = create_app(
        &config(root.clone(), server.url("/main.tar.gz")),
        &Services::new(&runner, &downloader),
        &mut ui,
    )
    .unwrap();

    assert_eq!(downloader.calls.get(), 3);
    archive.assert_calls(1);
    assert!(root.join("lib/db.ts").exists());
    assert!(root.join("README-template.md").exists());
    assert_eq!(outcome.git, Some(GitInitOutcome::Initialized));
    assert!(!outcome.dependencies_installed);
}

#[test]
fn versioned_target_keeps_success() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/main.tar.gz");
        then.status(200).body(tarball());
    });
    let out = TempDir::new().unwrap();
    let root = out.path().join("inside-repo");
    let http = HttpFetcher::new().unwrap();
    let runner = RecordingRunner::new();
    let mut ui = MockUI::new();

    let outcome = create_app(
        &config(root, server.url("/main.tar.gz")),
        &Services::new(&runner, &http),
        &mut ui,
    )
    .unwrap();

    assert_eq!(outcome.git, Some(GitInitOutcome::AlreadyVersioned));
    assert!(!runner.ran("git init"));
    assert!(ui.has_skipped("already inside a repository"));
}

#[test]
fn env_installation_is_idempotent() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".env.example"),
        "# Tigris\nTIGRIS_URI=[TIGRIS_URI]\nTIGRIS_CLIENT_ID=[TIGRIS_CLIENT_ID]\n",
    )
    .unwrap();
    let params = EnvParams {
        uri: "api.preview.tigrisdata.cloud".into(),
        project: "my-app".into(),
        client_id: "id".into(),
        client_secret: "secret".into(),
        db_branch: "main".into(),
        insecure_channel: false,
    };

    let path = install_env(temp.path(), &params).unwrap();
    let first = fs::read(&path).unwrap();
    install_env(temp.path(), &params).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert!(text.starts_with("# Tigris\nTIGRIS_URI=api.preview.tigrisdata.cloud\n"));
    assert!(text.contains("TIGRIS_DB_BRANCH=main\n"));
}
