//! The default command: create an app.
//!
//! Collects the run's values from flags, environment variables and
//! prompts, validates them into a [`ScaffoldConfig`], then hands off to
//! [`create_app`].

use std::path::{Path, PathBuf};

use crate::app::{create_app, Services};
use crate::cli::args::CreateArgs;
use crate::config::{project_name_of, resolve_app_path, Credentials, Environment, ScaffoldConfig};
use crate::error::{Result, ScaffoldError};
use crate::manifest::validate_project_name;
use crate::registry::{
    is_git_url, resolve_template, HttpFetcher, TemplateCatalog, TemplateRef, DEFAULT_TEMPLATE,
};
use crate::shell::SystemRunner;
use crate::ui::{not_blank, Prompt, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandResult};

const BIN: &str = "create-tigris-app";

/// Project name suggested by the interactive prompt.
pub const DEFAULT_PROJECT_NAME: &str = "myapp";

/// Picker value that asks for a Git URL instead of a catalog name.
const FROM_GIT_URL: &str = "<git-url>";

const GIT_URL_QUESTION: &str = "Please enter a valid Git URL";

fn project_usage() -> String {
    format!(
        "Please specify the project directory:\n  \
         {BIN} --project <project-directory>\n\
         For example:\n  \
         {BIN} --project my-app\n\n\
         Run {BIN} --help to see all options."
    )
}

fn credentials_usage() -> String {
    format!(
        "Please specify the clientId and clientSecret\n\
         For example:\n  \
         {BIN} --client-id xxx --client-secret xxx\n\n\
         Run {BIN} --help to see all options."
    )
}

/// Prompt validator for the project path: its basename must be a valid
/// package name.
fn valid_project_answer(answer: &str) -> std::result::Result<(), String> {
    let name = project_name_of(Path::new(answer.trim()));
    validate_project_name(&name)
        .map_err(|problems| format!("Invalid project name: {}", problems.join(", ")))
}

fn valid_git_answer(answer: &str) -> std::result::Result<(), String> {
    if is_git_url(answer) {
        Ok(())
    } else {
        Err(format!("{} (https://... or git@...)", GIT_URL_QUESTION))
    }
}

/// Trimmed, non-empty flag value.
fn given(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The create command implementation.
pub struct CreateCommand {
    cwd: PathBuf,
    args: CreateArgs,
}

impl CreateCommand {
    /// Create a new create command resolving paths against `cwd`.
    pub fn new(cwd: &Path, args: CreateArgs) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            args,
        }
    }

    /// Build the run configuration, prompting for anything missing.
    pub fn config(&self, ui: &mut dyn UserInterface) -> Result<ScaffoldConfig> {
        let project = self.project(ui)?;
        let app_path = resolve_app_path(&self.cwd, &project);
        let project_name = project_name_of(&app_path);
        validate_project_name(&project_name).map_err(|problems| {
            ScaffoldError::InvalidProjectName {
                name: project_name.clone(),
                problems,
            }
        })?;

        let (environment, rejected) = Environment::resolve(self.args.environment.as_deref());
        if let Some(tag) = rejected {
            ui.warning(&format!(
                "Unknown environment '{}', using '{}'. Allowed: {}",
                tag,
                environment,
                Environment::allowed_tags()
            ));
        }

        let uri = match given(&self.args.uri) {
            Some(uri) => uri,
            None => ask(
                ui,
                Prompt::input("uri", "What is the URI?")
                    .with_default(environment.default_uri())
                    .with_validator(not_blank),
                "uri",
                "Please specify the URI with --uri",
            )?,
        };

        let credentials = self.credentials(ui)?;
        let template = self.template(ui)?;

        let mut config = ScaffoldConfig::new(app_path, template, credentials);
        config.package_manager = self.args.package_manager();
        config.uri = uri;
        config.environment = environment;
        config.db_branch = self.args.db_branch.trim().to_string();
        config.templates_dir = self.args.templates_dir.clone();
        config.archive_url = self.args.archive_url.clone();
        config.install_dependencies = !self.args.no_install;
        config.init_git = !self.args.no_git;

        tracing::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    fn project(&self, ui: &mut dyn UserInterface) -> Result<String> {
        if let Some(project) = given(&self.args.project) {
            return Ok(project);
        }

        let mut prompt = Prompt::input("project", "What is your project named?")
            .with_validator(valid_project_answer);
        if ui.is_interactive() {
            prompt = prompt.with_default(DEFAULT_PROJECT_NAME);
        }
        ask(ui, prompt, "project directory", &project_usage())
    }

    fn credentials(&self, ui: &mut dyn UserInterface) -> Result<Credentials> {
        let usage = credentials_usage();

        let client_id = match given(&self.args.client_id) {
            Some(id) => id,
            None => ask(
                ui,
                Prompt::input("client_id", "What is the clientId?").with_validator(not_blank),
                "clientId",
                &usage,
            )?,
        };
        let client_secret = match given(&self.args.client_secret) {
            Some(secret) => secret,
            None => ask(
                ui,
                Prompt::password("client_secret", "What is the clientSecret?")
                    .with_validator(not_blank),
                "clientSecret",
                &usage,
            )?,
        };

        Ok(Credentials {
            client_id,
            client_secret,
        })
    }

    fn catalog(&self) -> Result<TemplateCatalog> {
        match &self.args.templates_dir {
            Some(dir) => TemplateCatalog::from_dir(dir),
            None => TemplateCatalog::fetch_remote(&HttpFetcher::new()?, &self.args.catalog_url),
        }
    }

    fn template(&self, ui: &mut dyn UserInterface) -> Result<TemplateRef> {
        let mut input = given(&self.args.example);
        let mut loaded = None;

        if input.is_none() && ui.is_interactive() {
            let catalog = self.catalog()?;
            let mut options: Vec<_> = catalog
                .names()
                .iter()
                .map(|name| PromptOption::plain(name))
                .collect();
            options.push(PromptOption {
                label: "Git URL".to_string(),
                value: FROM_GIT_URL.to_string(),
            });
            let mut choice = ui.prompt(
                &Prompt::select("template", "Pick the template", options)
                    .with_default(DEFAULT_TEMPLATE),
            )?;
            if choice == FROM_GIT_URL {
                choice = ask(
                    ui,
                    Prompt::input("git_url", GIT_URL_QUESTION).with_validator(valid_git_answer),
                    "gitUrl",
                    GIT_URL_QUESTION,
                )?;
            }
            input = Some(choice);
            loaded = Some(catalog);
        }

        resolve_template(input.as_deref(), || match loaded {
            Some(catalog) => Ok(catalog),
            None => self.catalog(),
        })
    }
}

/// Ask `prompt`, turning a missing or blank answer into
/// [`ScaffoldError::MissingValue`] with `usage`.
fn ask(ui: &mut dyn UserInterface, prompt: Prompt, name: &str, usage: &str) -> Result<String> {
    let missing = || ScaffoldError::MissingValue {
        name: name.to_string(),
        usage: usage.to_string(),
    };

    match ui.prompt(&prompt) {
        Ok(answer) if !answer.trim().is_empty() => {
            prompt.validate(&answer).map_err(|message| ScaffoldError::MissingValue {
                name: name.to_string(),
                usage: message,
            })?;
            Ok(answer.trim().to_string())
        }
        Ok(_) | Err(ScaffoldError::MissingValue { .. }) => Err(missing()),
        Err(e) => Err(e),
    }
}

impl Command for CreateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.config(ui)?;

        let runner = SystemRunner::new();
        let downloader = HttpFetcher::new()?;
        let services = Services::new(&runner, &downloader);

        if let Err(e) = create_app(&config, &services, ui) {
            ui.message("");
            ui.message("Aborting installation.");
            if let ScaffoldError::CommandFailed { command, .. } = &e {
                ui.message(&format!("  {} has failed.", command));
            }
            return Err(e);
        }

        Ok(CommandResult::success())
    }
}
