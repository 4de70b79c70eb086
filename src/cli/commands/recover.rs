//! `passvault recover` — re-encrypt a vault that an interrupted command
//! left in plaintext.

use crate::cli::output;
use crate::cli::{credential_vault, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `recover` command.
pub fn execute(cli: &Cli, username: &str) -> Result<()> {
    let vaults = credential_vault(cli)?;
    let password = prompt_password(username)?;

    if vaults.recover(username, &password)? {
        output::success(&format!("Vault for {username} is encrypted again."));
        output::tip("Check it with `passvault list <USERNAME>`.");
    } else {
        output::info(&format!("Vault for {username} is already encrypted."));
    }

    Ok(())
}
