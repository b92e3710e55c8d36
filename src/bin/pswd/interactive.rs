//! The prompt-driven front end: a length and a set of character types, which can be changed
//! between passwords, then generate until the user keeps one.

use anyhow::Context;
use dialoguer::theme::ColorfulTheme;
use log::debug;

use crate::ProgError;
use pswd::password_generation;
use pswd::{
    CharacterClass, GenerationRequest, GenerationResult, MAX_LENGTH, MIN_LENGTH, NO_CLASS_SELECTED,
};

pub(crate) fn run_interactive() -> Result<(), ProgError> {
    let theme = ColorfulTheme::default();
    let mut request = prompt_request(&theme, &GenerationRequest::default())?;

    let mut rng = rand::thread_rng();
    loop {
        debug!(
            "interactive request: length {}, classes {:?}",
            request.length(),
            request.classes()
        );
        let secret = match password_generation::generate_password(&mut rng, &request)? {
            GenerationResult::Password(secret) => secret,
            GenerationResult::NoClassSelected => {
                eprintln!("{}", console::style(NO_CLASS_SELECTED).yellow());
                request = prompt_request(&theme, &request)?;
                continue;
            }
        };
        println!("{}", console::style(secret.as_str()).bold());

        let items = &[
            "Generate another",
            "Change length and types",
            "Copy to the clipboard",
            "Quit",
        ];
        let selection = dialoguer::Select::with_theme(&theme)
            .items(&items[..])
            .default(0)
            .interact_opt()
            .context("failed to get your answer to a prompt")?
            .ok_or(ProgError::PromptCancelled)?;
        match selection {
            0 => continue,
            1 => request = prompt_request(&theme, &request)?,
            2 => {
                crate::generate::send_to_clipboard(secret.as_str().as_bytes())
                    .context("failed to copy the password to the clipboard")?;
                eprintln!("{}", console::style("Copied.").green());
                return Ok(());
            }
            3 => return Ok(()),
            _ => panic!(),
        }
    }
}

/// Ask for a length and a set of types, starting from the values in `current`.
fn prompt_request(
    theme: &ColorfulTheme,
    current: &GenerationRequest,
) -> Result<GenerationRequest, ProgError> {
    let length = dialoguer::Input::<usize>::with_theme(theme)
        .with_prompt(format!("Length ({MIN_LENGTH}-{MAX_LENGTH})"))
        .default(current.length())
        .validate_with(|length: &usize| check_length(*length))
        .interact_text()
        .context("failed to read the password length")?;

    let labels = CharacterClass::ALL.map(CharacterClass::label);
    let picked = dialoguer::MultiSelect::with_theme(theme)
        .with_prompt("Character types (space to toggle)")
        .items(&labels)
        .defaults(&checked_classes(current))
        .interact_opt()
        .context("failed to read the character types")?
        .ok_or(ProgError::PromptCancelled)?;

    Ok(request_from_picks(length, &picked))
}

/// Which entries of `CharacterClass::ALL` start out ticked.
fn checked_classes(request: &GenerationRequest) -> [bool; 3] {
    CharacterClass::ALL.map(|class| request.classes().contains(&class))
}

fn request_from_picks(length: usize, picked: &[usize]) -> GenerationRequest {
    GenerationRequest::new(length, picked.iter().map(|&idx| CharacterClass::ALL[idx]))
}

fn check_length(length: usize) -> Result<(), String> {
    if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(format!("Pick a length between {MIN_LENGTH} and {MAX_LENGTH}."))
    }
}
