//! `passvault update` — replace the password stored under a label.

use crate::cli::output;
use crate::cli::{credential_vault, prompt_password, read_secret_value, Cli};
use crate::errors::Result;

/// Execute the `update` command.
pub fn execute(
    cli: &Cli,
    username: &str,
    label: &str,
    value: Option<&str>,
    generate: bool,
) -> Result<()> {
    let vaults = credential_vault(cli)?;
    let secret = read_secret_value(label, value, generate)?;
    let password = prompt_password(username)?;

    vaults.with_vault(username, &password, |vault| vault.update(label, &secret))?;

    if generate {
        output::info(&format!("Generated password: {}", secret.as_str()));
    }
    output::success(&format!("Updated password for '{label}' under {username}"));

    Ok(())
}
