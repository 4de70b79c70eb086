//! A single label-keyed secret.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// One `(label, secret)` pair inside a vault.
///
/// Both strings are wiped from memory when the entry is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entry {
    pub label: String,
    pub secret: String,
}

impl Entry {
    pub fn new(label: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            secret: secret.into(),
        }
    }

    /// Replace the secret, wiping the old value first.
    pub(crate) fn replace_secret(&mut self, secret: &str) {
        self.secret.zeroize();
        self.secret = secret.to_string();
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("label", &self.label)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Labels that would read back as header lines of an exported bundle.
pub const RESERVED_LABELS: [&str; 2] = ["username", "master_password"];

/// Validate that a label can be stored and read back unchanged.
///
/// Labels must be non-empty, free of `:` and line breaks, and carry no
/// leading or trailing whitespace.  The bundle header names are
/// reserved.
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(VaultError::InvalidEntry("label cannot be empty".into()));
    }
    if label.contains(':') {
        return Err(VaultError::InvalidEntry(format!(
            "label '{label}' cannot contain ':'"
        )));
    }
    if label.contains(['\n', '\r']) {
        return Err(VaultError::InvalidEntry(
            "label cannot contain line breaks".into(),
        ));
    }
    if label.trim() != label {
        return Err(VaultError::InvalidEntry(format!(
            "label '{label}' cannot start or end with whitespace"
        )));
    }
    if RESERVED_LABELS.contains(&label) {
        return Err(VaultError::InvalidEntry(format!(
            "label '{label}' is reserved"
        )));
    }
    Ok(())
}

/// Validate that a secret fits on a single line.
pub fn validate_secret(secret: &str) -> Result<()> {
    if secret.contains(['\n', '\r']) {
        return Err(VaultError::InvalidEntry(
            "secret cannot contain line breaks".into(),
        ));
    }
    Ok(())
}
