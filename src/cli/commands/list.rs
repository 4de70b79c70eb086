//! `passvault list` — display every stored password in a table.

use crate::cli::output;
use crate::cli::{credential_vault, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, username: &str) -> Result<()> {
    let vaults = credential_vault(cli)?;
    let password = prompt_password(username)?;

    let entries = vaults.with_vault(username, &password, |vault| {
        vault.note(format!("Retrieved all passwords for {username}."));
        Ok(vault.retrieve().to_vec())
    })?;

    output::info(&format!("{username} — {} password(s)", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}
