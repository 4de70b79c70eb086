//! `passvault import` — merge an exported bundle into an existing account.
//!
//! The bundle names the account and carries its master password; the
//! account must already exist.  Labels already in the vault are kept.

use std::path::Path;

use crate::cli::output;
use crate::cli::{credential_vault, Cli};
use crate::errors::Result;
use crate::transfer::{self, PortableBundle};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str) -> Result<()> {
    let vaults = credential_vault(cli)?;
    let bundle = PortableBundle::read_from(Path::new(file_path))?;

    if bundle.entries.is_empty() {
        output::warning("No passwords found in the import file.");
    }

    let summary = transfer::import(&vaults, &bundle)?;

    for label in &summary.imported {
        output::info(&format!("  + {label}"));
    }
    for label in &summary.skipped {
        output::warning(&format!("  = {label} (already present, skipped)"));
    }

    output::success(&format!(
        "Imported {} passwords for {} ({} skipped)",
        summary.imported.len(),
        summary.username,
        summary.skipped.len()
    ));

    Ok(())
}
