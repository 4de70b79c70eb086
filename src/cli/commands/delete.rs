//! `passvault delete` — remove the password stored under a label.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{credential_vault, prompt_password, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, username: &str, label: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password '{label}' for {username}?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let vaults = credential_vault(cli)?;
    let password = prompt_password(username)?;

    let remaining = vaults.with_vault(username, &password, |vault| {
        vault.delete(label)?;
        Ok(vault.len())
    })?;

    output::success(&format!(
        "Deleted password for '{label}' under {username} ({remaining} left)"
    ));

    Ok(())
}
