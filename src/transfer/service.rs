//! Export a vault to a bundle, or merge a bundle into a vault.

use std::path::Path;

use crate::errors::{Result, VaultError};
use crate::vault::CredentialVault;

use super::bundle::PortableBundle;

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub username: String,
    /// Labels appended to the vault, in bundle order.
    pub imported: Vec<String>,
    /// Labels left alone because the vault already had them (or they
    /// could not be stored as-is).
    pub skipped: Vec<String>,
}

/// Copy every entry of `username`'s vault into a bundle.
///
/// The vault is closed (re-protected) before the bundle is returned.
/// The bundle itself is plaintext; protecting it is up to the caller.
/// Nothing is audited here, see [`export_to`].
pub fn export(
    vaults: &CredentialVault,
    username: &str,
    master_password: &str,
) -> Result<PortableBundle> {
    let entries =
        vaults.with_vault(username, master_password, |vault| Ok(vault.retrieve().to_vec()))?;
    let bundle = PortableBundle::new(username, master_password, entries);
    bundle.check_exportable()?;
    Ok(bundle)
}

/// Export `username`'s vault and write the bundle to `dest`.
///
/// The destination is checked before the vault is opened, and the
/// export is audited only once the bundle is on disk.
pub fn export_to(
    vaults: &CredentialVault,
    username: &str,
    master_password: &str,
    dest: &Path,
    overwrite: bool,
) -> Result<PortableBundle> {
    PortableBundle::check_destination(dest, overwrite)?;

    let bundle = export(vaults, username, master_password)?;
    bundle.write_to(dest, overwrite)?;

    vaults
        .audit()
        .record(&format!("Exported all passwords for {username}."));
    Ok(bundle)
}

/// Append the bundle's entries to the vault named in its header.
///
/// The target account must already exist.  Labels already present are
/// skipped, never overwritten.
pub fn import(vaults: &CredentialVault, bundle: &PortableBundle) -> Result<ImportSummary> {
    let username = bundle.username.as_str();

    vaults.with_vault(username, &bundle.master_password, |vault| {
        let mut summary = ImportSummary {
            username: username.to_string(),
            ..ImportSummary::default()
        };

        for entry in &bundle.entries {
            if vault.contains(&entry.label) {
                summary.skipped.push(entry.label.clone());
                continue;
            }
            match vault.add(&entry.label, &entry.secret) {
                Ok(()) => summary.imported.push(entry.label.clone()),
                Err(VaultError::InvalidEntry(_)) => summary.skipped.push(entry.label.clone()),
                Err(e) => return Err(e),
            }
        }

        vault.note(format!(
            "Imported {} passwords for {username}.",
            summary.imported.len()
        ));
        Ok(summary)
    })
}
