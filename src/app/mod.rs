//! The scaffolding pipeline.
//!
//! Stages run strictly in order: prepare the target, fetch the template,
//! rename the manifest and install dependencies, write `.env`, then
//! initialize git. Every stage but the last aborts the run on failure.

pub mod target;

use std::path::{Path, PathBuf};

use crate::assets::{self, NEXT_STEPS};
use crate::config::ScaffoldConfig;
use crate::detection::{is_online, PackageManager};
use crate::env_file::{install_env, EnvParams};
use crate::error::Result;
use crate::manifest::{install_dependencies, write_manifest, PackageManifest};
use crate::registry::fetch::copy_template;
use crate::registry::{ArchiveFetcher, Download, GitFetcher, TemplateRef};
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;
use crate::vcs::{GitInitOutcome, GitInitializer};

pub use target::{cd_path, check_target, prepare_target};

/// External capabilities the pipeline depends on.
pub struct Services<'a> {
    /// Runs `git`, `hg` and the package manager.
    pub runner: &'a dyn ProcessRunner,
    /// Downloads the template archive.
    pub downloader: &'a dyn Download,
    /// Reports whether the package registry is reachable.
    pub online: fn() -> bool,
}

impl<'a> Services<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, downloader: &'a dyn Download) -> Self {
        Self {
            runner,
            downloader,
            online: is_online,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The project directory.
    pub root: PathBuf,
    /// The package name written to the manifest.
    pub project_name: String,
    /// Whether the template shipped a `package.json`.
    pub has_manifest: bool,
    /// Whether the package manager ran.
    pub dependencies_installed: bool,
    /// Path of the generated `.env`.
    pub env_file: PathBuf,
    /// Result of git initialization, when attempted.
    pub git: Option<GitInitOutcome>,
}

/// Run the whole pipeline for `config`.
pub fn create_app(
    config: &ScaffoldConfig,
    services: &Services<'_>,
    ui: &mut dyn UserInterface,
) -> Result<CreateOutcome> {
    let root = config.app_path.as_path();

    prepare_target(root)?;
    ui.message(&format!("Creating a new app in {}.", root.display()));

    fetch_template(config, services, ui)?;

    let manifest = write_manifest(root, &config.project_name)?;
    let dependencies_installed = match &manifest {
        Some(manifest) if config.install_dependencies => {
            install(config, services, manifest, ui)?
        }
        Some(_) => {
            ui.message("Skipping dependency installation.");
            false
        }
        None => false,
    };

    let env_file = install_env(root, &env_params(config))?;
    ui.success(&format!("Created {}", env_file.display()));

    let git = if config.init_git {
        Some(init_git(services, root, ui))
    } else {
        None
    };

    let outcome = CreateOutcome {
        root: root.to_path_buf(),
        project_name: config.project_name.clone(),
        has_manifest: manifest.is_some(),
        dependencies_installed,
        env_file,
        git,
    };

    print_success(config, &outcome, manifest.as_ref(), ui)?;
    Ok(outcome)
}

fn fetch_template(
    config: &ScaffoldConfig,
    services: &Services<'_>,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let root = config.app_path.as_path();

    let (mut spinner, result) = match &config.template {
        TemplateRef::Git(url) => {
            // git writes its own progress to the terminal
            ui.message(&format!(
                "Downloading files from repo {}. This might take a moment.",
                url
            ));
            GitFetcher::new(services.runner).clone_shallow(url, root)?;
            ui.success(&format!("Fetched template {}", url));
            return Ok(());
        }
        TemplateRef::Named(name) => match &config.templates_dir {
            Some(dir) => {
                let spinner =
                    ui.start_spinner(&format!("Copying template {} from {}", name, dir.display()));
                let result = copy_template(dir, name, root).map(|_| ());
                (spinner, result)
            }
            None => {
                let spinner = ui.start_spinner(&format!(
                    "Downloading files for template {}. This might take a moment.",
                    name
                ));
                let fetcher =
                    ArchiveFetcher::new(services.downloader, &config.archive_url, config.retry);
                let result = fetcher.install(name, root).map(|_| ());
                (spinner, result)
            }
        },
    };

    match result {
        Ok(()) => {
            spinner.finish_success(&format!("Fetched template {}", config.template));
            Ok(())
        }
        Err(e) => {
            spinner.finish_error(&format!("Could not fetch template {}", config.template));
            Err(e)
        }
    }
}

fn install(
    config: &ScaffoldConfig,
    services: &Services<'_>,
    manifest: &PackageManifest,
    ui: &mut dyn UserInterface,
) -> Result<bool> {
    if !manifest.has_dependencies() {
        return Ok(false);
    }

    let package_manager = config.package_manager;
    ui.message(&format!("Using {}.", package_manager));

    let online = package_manager != PackageManager::Yarn || (services.online)();
    if !online {
        ui.warning("You appear to be offline. Falling back to the local cache.");
    }

    if ui.output_mode().shows_detail() {
        ui.message("Installing dependencies:");
        for (name, version) in manifest.dependencies() {
            ui.message(&format!("- {}: {}", name, version));
        }
    }

    install_dependencies(services.runner, package_manager, &config.app_path, online)?;
    ui.success("Installed dependencies");
    Ok(true)
}

fn init_git(services: &Services<'_>, root: &Path, ui: &mut dyn UserInterface) -> GitInitOutcome {
    let mut spinner = ui.start_spinner("Initializing a git repository");
    let outcome = GitInitializer::new(services.runner).initialize(root);

    if outcome.initialized() {
        spinner.finish_success(&outcome.to_string());
    } else {
        tracing::warn!("{}", outcome);
        spinner.finish_skipped(&outcome.to_string());
    }
    outcome
}

/// Values for `.env`, with the environment's default URI when none was given.
pub fn env_params(config: &ScaffoldConfig) -> EnvParams {
    EnvParams {
        uri: config.uri.clone(),
        project: config.project_name.clone(),
        client_id: config.credentials.client_id.clone(),
        client_secret: config.credentials.client_secret.clone(),
        db_branch: config.db_branch.clone(),
        insecure_channel: config.environment.insecure_channel(),
    }
}

/// Scripts advertised after a successful run, with their descriptions.
const SCRIPTS: [(&str, &str); 3] = [
    ("dev", "Starts the development server."),
    ("build", "Builds the app for production."),
    ("start", "Runs the built app in production mode."),
];

/// The next-steps block for `manifest`, run with `package_manager`.
///
/// Only scripts the manifest declares are listed. The first of them is the
/// suggested command after `cd`.
pub fn next_steps(
    package_manager: PackageManager,
    manifest: &PackageManifest,
    cd: &str,
) -> Result<String> {
    let declared: Vec<_> = SCRIPTS
        .iter()
        .filter(|(script, _)| manifest.has_script(script))
        .map(|(script, about)| (package_manager.run_script(script), *about))
        .collect();

    let mut commands = String::new();
    if !declared.is_empty() {
        commands.push_str("Inside that directory, you can run several commands:\n\n");
        for (command, about) in &declared {
            commands.push_str(&format!("  {}\n    {}\n\n", command, about));
        }
    }
    let first = declared
        .first()
        .map(|(command, _)| format!("  {}\n", command))
        .unwrap_or_default();

    assets::render_asset(
        NEXT_STEPS,
        &[
            ("COMMANDS", &commands),
            ("CD_PATH", cd),
            ("FIRST_COMMAND", &first),
        ],
    )
}

fn print_success(
    config: &ScaffoldConfig,
    outcome: &CreateOutcome,
    manifest: Option<&PackageManifest>,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ui.success(&format!(
        "Success! Created {} at {}",
        outcome.project_name,
        outcome.root.display()
    ));

    if let Some(manifest) = manifest {
        let cwd = std::env::current_dir().ok();
        let cd = cd_path(cwd.as_deref(), &outcome.root);
        ui.message(&next_steps(config.package_manager, manifest, &cd)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::registry::RetryPolicy;
    use crate::shell::{CommandStatus, RecordingRunner};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    struct NoDownload;

    impl Download for NoDownload {
        fn download(&self, url: &str, _dest: &mut dyn std::io::Write) -> anyhow::Result<u64> {
            anyhow::bail!("unexpected download of {}", url)
        }
    }

    fn offline() -> bool {
        false
    }

    fn templates_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        let default = temp.path().join("default");
        fs::create_dir_all(&default).unwrap();
        fs::write(
            default.join("package.json"),
            "{\n  \"name\": \"default\",\n  \"scripts\": {\n    \"dev\": \"next dev\"\n  },\n  \"dependencies\": {\n    \"@tigrisdata/core\": \"^1.0.0\"\n  }\n}\n",
        )
        .unwrap();
        fs::write(default.join(".env.example"), "TIGRIS_URI=[TIGRIS_URI]\n").unwrap();
        fs::write(default.join("gitignore"), "node_modules\n.env\n").unwrap();
        temp
    }

    fn config(root: PathBuf, templates: &Path) -> ScaffoldConfig {
        let mut config = ScaffoldConfig::new(
            root,
            TemplateRef::Named("default".into()),
            Credentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            },
        );
        config.templates_dir = Some(templates.to_path_buf());
        config.retry = RetryPolicy::immediate(3);
        config
    }

    /// Runner for a fresh directory outside any repository.
    fn runner() -> RecordingRunner {
        let runner = RecordingRunner::new();
        runner.fail("git rev-parse", 128);
        runner.fail("hg", 255);
        runner
    }

    #[test]
    fn runs_all_stages_in_order() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        let mut ui = MockUI::new();

        let outcome = create_app(
            &config(root.clone(), templates.path()),
            &Services::new(&runner, &NoDownload),
            &mut ui,
        )
        .unwrap();

        assert_eq!(outcome.project_name, "my-app");
        assert!(outcome.has_manifest);
        assert!(outcome.dependencies_installed);
        assert_eq!(outcome.git, Some(GitInitOutcome::Initialized));

        let manifest = fs::read_to_string(root.join("package.json")).unwrap();
        assert!(manifest.contains("\"name\": \"my-app\""));
        let env = fs::read_to_string(root.join(".env")).unwrap();
        assert!(env.starts_with("TIGRIS_URI=api.preview.tigrisdata.cloud\n"));
        assert!(env.contains("TIGRIS_CLIENT_SECRET=secret\n"));
        assert!(root.join(".gitignore").exists());

        let lines = runner.command_lines();
        let install = lines.iter().position(|l| l.starts_with("npm install")).unwrap();
        let init = lines.iter().position(|l| l == "git init").unwrap();
        assert!(install < init);
        assert!(ui.has_success("Success! Created my-app"));
        assert!(ui.has_message("npm run dev"));
    }

    #[test]
    fn non_empty_target_writes_nothing() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("existing.txt"), "keep").unwrap();
        let runner = runner();
        let mut ui = MockUI::new();

        let err = create_app(
            &config(root.clone(), templates.path()),
            &Services::new(&runner, &NoDownload),
            &mut ui,
        )
        .unwrap_err();

        assert!(matches!(err, crate::error::ScaffoldError::TargetNotEmpty { .. }));
        assert_eq!(fs::read_dir(&root).unwrap().count(), 1);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn git_failure_does_not_fail_the_run() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        runner.fail("git commit", 1);
        let mut ui = MockUI::new();

        let outcome = create_app(
            &config(root.clone(), templates.path()),
            &Services::new(&runner, &NoDownload),
            &mut ui,
        )
        .unwrap();

        assert!(matches!(outcome.git, Some(GitInitOutcome::Failed { .. })));
        assert!(!root.join(".git").exists());
        assert!(ui.has_skipped("git commit"));
    }

    #[test]
    fn already_versioned_target_skips_git() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = RecordingRunner::new();
        let mut ui = MockUI::new();

        let outcome = create_app(
            &config(root, templates.path()),
            &Services::new(&runner, &NoDownload),
            &mut ui,
        )
        .unwrap();

        assert_eq!(outcome.git, Some(GitInitOutcome::AlreadyVersioned));
        assert!(!runner.ran("git init"));
    }

    #[test]
    fn failed_install_aborts_before_env() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        runner.fail("npm install", 1);
        let mut ui = MockUI::new();

        let err = create_app(
            &config(root.clone(), templates.path()),
            &Services::new(&runner, &NoDownload),
            &mut ui,
        )
        .unwrap_err();

        assert!(matches!(err, crate::error::ScaffoldError::CommandFailed { .. }));
        assert!(root.join("package.json").exists());
        assert!(!root.join(".env").exists());
        assert!(!runner.ran("git init"));
    }

    #[test]
    fn opt_outs_skip_install_and_git() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        let mut ui = MockUI::new();
        let mut config = config(root.clone(), templates.path());
        config.install_dependencies = false;
        config.init_git = false;

        let outcome = create_app(&config, &Services::new(&runner, &NoDownload), &mut ui).unwrap();

        assert!(!outcome.dependencies_installed);
        assert!(outcome.git.is_none());
        assert!(runner.calls().is_empty());
        assert!(root.join(".env").exists());
    }

    #[test]
    fn yarn_offline_installs_from_cache() {
        let templates = templates_dir();
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        let mut ui = MockUI::new();
        let mut config = config(root, templates.path());
        config.package_manager = PackageManager::Yarn;
        config.init_git = false;
        let services = Services {
            online: offline,
            ..Services::new(&runner, &NoDownload)
        };

        create_app(&config, &services, &mut ui).unwrap();

        assert!(runner.ran("yarn install --non-interactive --offline"));
        assert!(ui.has_warning("offline"));
    }

    #[test]
    fn git_template_is_cloned() {
        let out = TempDir::new().unwrap();
        let root = out.path().join("my-app");
        let runner = runner();
        runner.on("git clone", |spec| {
            let root = PathBuf::from(spec.args.last().unwrap());
            fs::create_dir_all(root.join(".git")).unwrap();
            fs::write(root.join("README.md"), "# example\n").unwrap();
            Ok(CommandStatus::ok())
        });
        let mut ui = MockUI::new();
        let mut config = ScaffoldConfig::new(
            root.clone(),
            TemplateRef::Git("https://github.com/org/example.git".into()),
            Credentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            },
        );
        config.init_git = false;

        let outcome = create_app(&config, &Services::new(&runner, &NoDownload), &mut ui).unwrap();

        assert!(!outcome.has_manifest);
        assert!(root.join("README.md").exists());
        assert!(!root.join(".git").exists());
        assert_eq!(
            fs::read_to_string(root.join(".env")).unwrap().lines().count(),
            5
        );
        assert!(!ui.has_message("npm run dev"));
    }

    #[test]
    fn local_environment_writes_insecure_flag() {
        let mut config = config(PathBuf::from("/tmp/app"), Path::new("/tmp"));
        config.environment = crate::config::Environment::Local;
        config.uri = config.environment.default_uri().to_string();

        let params = env_params(&config);
        assert!(params.insecure_channel);
        assert_eq!(params.uri, "localhost:8081");
    }

    fn manifest(dir: &TempDir, scripts: &str) -> PackageManifest {
        let path = dir.path().join("package.json");
        fs::write(&path, format!("{{\"name\": \"app\", \"scripts\": {}}}", scripts)).unwrap();
        PackageManifest::load(&path).unwrap()
    }

    #[test]
    fn next_steps_use_package_manager_commands() {
        let temp = TempDir::new().unwrap();
        let all = manifest(&temp, r#"{"dev": "a", "build": "b", "start": "c"}"#);

        let npm = next_steps(PackageManager::Npm, &all, "my-app").unwrap();
        assert!(npm.starts_with("Inside that directory"));
        assert!(npm.contains("  npm run build\n    Builds the app for production.\n"));
        assert!(npm.contains("  npm start\n"));
        assert!(npm.ends_with("  cd my-app\n  npm run dev\n"));

        let yarn = next_steps(PackageManager::Yarn, &all, "/srv/my-app").unwrap();
        assert!(yarn.contains("  yarn dev"));
        assert!(yarn.contains("  cd /srv/my-app"));
    }

    #[test]
    fn next_steps_list_only_declared_scripts() {
        let temp = TempDir::new().unwrap();
        let start_only = manifest(&temp, r#"{"start": "node index.js", "test": "jest"}"#);

        let out = next_steps(PackageManager::Npm, &start_only, "my-app").unwrap();
        assert!(!out.contains("run dev"));
        assert!(!out.contains("run build"));
        assert!(out.ends_with("  cd my-app\n  npm start\n"));

        let none = manifest(&temp, "{}");
        let out = next_steps(PackageManager::Npm, &none, "my-app").unwrap();
        assert!(!out.contains("Inside that directory"));
        assert!(out.ends_with("  cd my-app\n"));
    }
}
