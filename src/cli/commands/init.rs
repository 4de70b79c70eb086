//! `passvault init` — set up a new account with an empty vault.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{credential_vault, prompt_new_password, Cli};
use crate::errors::{Result, VaultError};
use crate::policy;

/// Execute the `init` command.
pub fn execute(cli: &Cli, username: &str, generate: bool) -> Result<()> {
    let vaults = credential_vault(cli)?;

    // Fail before prompting if the account is taken.
    if vaults.exists(username)? {
        output::tip("Choose a different username.");
        return Err(VaultError::AlreadyExists(username.to_string()));
    }

    let password = if generate {
        let pw = Zeroizing::new(policy::generate());
        output::info(&format!("Generated master password: {}", pw.as_str()));
        output::warning("Store it somewhere safe — it cannot be recovered.");
        pw
    } else {
        prompt_new_password()?
    };

    vaults.create(username, &password)?;

    output::success(&format!(
        "Account setup completed for '{}' at {}",
        username,
        vaults.vault_path(username)?.display()
    ));
    output::tip("Run `passvault add <USERNAME> <LABEL>` to store a password.");

    Ok(())
}
