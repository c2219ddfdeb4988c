//! Interactive field prompts shared by `credentials` and `deploy`.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};

use crate::domain::field::{Field, FieldKind};

/// Prompt for one field's value, using its current value as the default.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails (e.g. no TTY available).
pub fn prompt_field(field: &Field) -> Result<String> {
    let current = field.value().to_string();
    let value = match &field.kind {
        FieldKind::Secret => Password::new()
            .with_prompt(&field.label)
            .allow_empty_password(!field.required || !current.is_empty())
            .interact()
            .with_context(|| format!("reading {}", field.key))
            .map(|v| if v.is_empty() { current } else { v })?,
        FieldKind::Choice(options) if !options.is_empty() => {
            let default = options.iter().position(|o| *o == current).unwrap_or(0);
            let idx = Select::new()
                .with_prompt(&field.label)
                .items(options)
                .default(default)
                .interact()
                .with_context(|| format!("reading {}", field.key))?;
            options[idx].clone()
        }
        FieldKind::Text | FieldKind::Choice(_) => Input::<String>::new()
            .with_prompt(&field.label)
            .with_initial_text(current)
            .allow_empty(!field.required)
            .interact_text()
            .with_context(|| format!("reading {}", field.key))?,
    };
    Ok(value)
}

/// Prompt for `field` until it validates, showing each validation error.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails.
pub fn prompt_until_valid(field: &mut Field, on_error: impl Fn(&str)) -> Result<()> {
    loop {
        let value = prompt_field(field)?;
        field.set_value(value);
        if field.validate() {
            return Ok(());
        }
        if let Some(err) = field.error() {
            on_error(err);
        }
    }
}

/// Prompt for a privileged-access password.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails.
pub fn prompt_sudo_password() -> Result<String> {
    Password::new()
        .with_prompt("sudo password")
        .interact()
        .context("reading sudo password")
}
