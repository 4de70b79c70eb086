//! `passvault export` — write every password of an account to a
//! plaintext bundle that `passvault import` understands.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{credential_vault, prompt_password, Cli};
use crate::errors::{Result, VaultError};
use crate::transfer::{self, PortableBundle};

/// Execute the `export` command.
pub fn execute(cli: &Cli, username: &str, output_path: Option<&str>, force: bool) -> Result<()> {
    let dest = match output_path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(PortableBundle::default_file_name(username)),
    };

    // Safety: refuse to export over a vault file.
    if dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("enc"))
    {
        return Err(VaultError::CommandFailed(
            "refusing to export over a .enc vault file".into(),
        ));
    }

    // Refuse before asking for the password and decrypting anything.
    PortableBundle::check_destination(&dest, force)?;

    let vaults = credential_vault(cli)?;
    let password = prompt_password(username)?;

    let bundle = transfer::export_to(&vaults, username, &password, &dest, force)?;

    output::success(&format!(
        "Exported {} passwords for {} to {}",
        bundle.entries.len(),
        username,
        dest.display()
    ));
    output::warning("The export file holds your master password and all passwords in plaintext.");

    Ok(())
}
