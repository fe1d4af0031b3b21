//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use crate::error::{Result, ScaffoldError};

use super::{Prompt, PromptOption, PromptType};

/// Convert dialoguer errors to ScaffoldError.
fn map_dialoguer_err(e: dialoguer::Error) -> ScaffoldError {
    ScaffoldError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<String> {
    match &prompt.prompt_type {
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Password => prompt_password(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<String> {
    let theme = prompt_theme();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);

    if let Some(default) = &prompt.default {
        input = input.default(default.clone());
    }
    if let Some(check) = prompt.validator {
        input = input.validate_with(move |answer: &String| check(answer));
    }

    let answer = input.interact_on(term).map_err(map_dialoguer_err)?;
    Ok(answer.trim().to_string())
}

fn prompt_password(prompt: &Prompt, term: &Term) -> Result<String> {
    let theme = prompt_theme();
    loop {
        let answer = Password::with_theme(&theme)
            .with_prompt(&prompt.question)
            .allow_empty_password(true)
            .interact_on(term)
            .map_err(map_dialoguer_err)?;

        match prompt.validate(&answer) {
            Ok(()) => return Ok(answer.trim().to_string()),
            Err(message) => {
                term.write_line(&format!("{}", style(message).red())).ok();
            }
        }
    }
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<String> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    options
        .get(selection)
        .map(|o| o.value.clone())
        .ok_or_else(|| ScaffoldError::MissingValue {
            name: prompt.key.clone(),
            usage: "No option was selected.".to_string(),
        })
}
