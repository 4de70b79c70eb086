//! Account lifecycle and vault sessions.
//!
//! `CredentialVault` knows where vault files live and how to protect
//! them.  `open` hands out an `OpenVault` session: the vault file sits
//! in plaintext on disk until the session is closed (commit) or dropped
//! (rollback), and is ciphertext again either way.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::audit::AuditLog;
use crate::config::Settings;
use crate::crypto::gateway::write_atomic;
use crate::crypto::CipherGateway;
use crate::errors::{Result, VaultError};
use crate::policy;

use super::codec;
use super::entry::{validate_label, validate_secret, Entry};

/// Suffix appended to the username to build the vault file name.
const VAULT_FILE_SUFFIX: &str = "_passwords.enc";

/// Entry point for every account operation.
#[derive(Debug, Clone)]
pub struct CredentialVault {
    /// Directory holding one vault file per account.
    dir: PathBuf,
    gateway: CipherGateway,
    audit: AuditLog,
}

impl CredentialVault {
    pub fn new(dir: impl Into<PathBuf>, gateway: CipherGateway, audit: AuditLog) -> Self {
        Self {
            dir: dir.into(),
            gateway,
            audit,
        }
    }

    /// Build a vault rooted in `project_dir` using the loaded settings.
    pub fn from_settings(project_dir: &Path, settings: &Settings) -> Result<Self> {
        let gateway = CipherGateway::new(settings.kdf_iterations)?;
        Ok(Self::new(
            settings.vault_dir_path(project_dir),
            gateway,
            AuditLog::new(settings.audit_log_path(project_dir)),
        ))
    }

    /// Directory holding the vault files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The audit sink every committed operation reports to.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Path of the vault file for `username`.
    ///
    /// Example: `<vault_dir>/alice_passwords.enc`
    pub fn vault_path(&self, username: &str) -> Result<PathBuf> {
        validate_username(username)?;
        Ok(self.dir.join(format!("{username}{VAULT_FILE_SUFFIX}")))
    }

    /// Returns `true` if a vault file exists for `username`.
    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.vault_path(username)?.exists())
    }

    // ------------------------------------------------------------------
    // Account lifecycle
    // ------------------------------------------------------------------

    /// Create an empty, protected vault for a new account.
    ///
    /// Never overwrites: an existing vault file is an `AlreadyExists`
    /// error even when the password would differ.
    pub fn create(&self, username: &str, master_password: &str) -> Result<()> {
        let path = self.vault_path(username)?;

        if path.exists() {
            return Err(VaultError::AlreadyExists(username.to_string()));
        }
        if !policy::is_strong(master_password) {
            return Err(VaultError::WeakPassword);
        }

        ensure_vault_dir(&self.dir)?;

        // create_new closes the gap between the exists() check and the write.
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => VaultError::AlreadyExists(username.to_string()),
            _ => VaultError::Io(e),
        })?;

        if let Err(e) = self.gateway.protect(&path, master_password.as_bytes()) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        self.audit
            .record(&format!("Account setup completed for {username}."));
        Ok(())
    }

    /// Decrypt the vault for `username` and start a session.
    ///
    /// A wrong password yields `WrongPassword` and leaves the file
    /// byte-for-byte unchanged.
    pub fn open(&self, username: &str, master_password: &str) -> Result<OpenVault> {
        let path = self.vault_path(username)?;

        if !path.exists() {
            return Err(VaultError::NotFound(username.to_string()));
        }

        self.gateway.reveal(&path, master_password.as_bytes())?;

        // From here on the file is plaintext; the session's Drop restores it.
        let mut vault = OpenVault {
            username: username.to_string(),
            path,
            password: Zeroizing::new(master_password.to_string()),
            entries: Vec::new(),
            gateway: self.gateway,
            audit: self.audit.clone(),
            pending: Vec::new(),
            closed: false,
        };

        let plaintext = Zeroizing::new(fs::read(&vault.path)?);
        vault.entries = codec::parse(&plaintext);

        Ok(vault)
    }

    /// Open the vault, run `f`, and close the vault on every path.
    ///
    /// Mutations that succeeded before `f` failed are still committed.
    /// An error from `f` takes precedence over an error from `close`.
    pub fn with_vault<T, F>(&self, username: &str, master_password: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut OpenVault) -> Result<T>,
    {
        let mut vault = self.open(username, master_password)?;
        let outcome = f(&mut vault);
        let closed = vault.close();

        let value = outcome?;
        closed?;
        Ok(value)
    }

    /// Re-protect a vault left in plaintext by an interrupted session.
    ///
    /// Returns `Ok(false)` when the file is already protected.
    pub fn recover(&self, username: &str, master_password: &str) -> Result<bool> {
        let path = self.vault_path(username)?;

        if !path.exists() {
            return Err(VaultError::NotFound(username.to_string()));
        }
        if self.gateway.is_protected(&path)? {
            return Ok(false);
        }

        self.gateway.protect(&path, master_password.as_bytes())?;
        self.audit
            .record(&format!("Re-protected vault for {username}."));
        Ok(true)
    }
}

/// A decrypted vault.
///
/// Call [`OpenVault::close`] to commit.  Dropping the session without
/// closing it re-protects the file as `open` left it, discarding any
/// in-memory changes.
pub struct OpenVault {
    username: String,
    path: PathBuf,
    password: Zeroizing<String>,
    entries: Vec<Entry>,
    gateway: CipherGateway,
    audit: AuditLog,
    /// Audit events recorded once the session commits.
    pending: Vec<String>,
    closed: bool,
}

impl std::fmt::Debug for OpenVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenVault")
            .field("username", &self.username)
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl OpenVault {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Append a new entry.
    pub fn add(&mut self, label: &str, secret: &str) -> Result<()> {
        validate_label(label)?;
        validate_secret(secret)?;

        if self.contains(label) {
            return Err(VaultError::DuplicateLabel(label.to_string()));
        }

        self.entries.push(Entry::new(label, secret));
        self.pending.push(format!(
            "Stored password for {label} under {}.",
            self.username
        ));
        Ok(())
    }

    /// Replace the secret of an existing entry, keeping its position.
    pub fn update(&mut self, label: &str, secret: &str) -> Result<()> {
        validate_secret(secret)?;

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.label == label)
            .ok_or_else(|| VaultError::LabelNotFound(label.to_string()))?;

        entry.replace_secret(secret);
        self.pending.push(format!(
            "Updated password for {label} under {}.",
            self.username
        ));
        Ok(())
    }

    /// Remove exactly one entry; the others keep their order.
    pub fn delete(&mut self, label: &str) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.label == label)
            .ok_or_else(|| VaultError::LabelNotFound(label.to_string()))?;

        self.entries.remove(index);
        self.pending.push(format!(
            "Deleted password for {label} under {}.",
            self.username
        ));
        Ok(())
    }

    /// All entries in insertion order.
    pub fn retrieve(&self) -> &[Entry] {
        &self.entries
    }

    /// The secret stored under `label`, if any.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.secret.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue an extra audit event for when the session commits.
    pub fn note(&mut self, event: impl Into<String>) {
        self.pending.push(event.into());
    }

    /// Write the entries back and re-protect the vault file.
    pub fn close(mut self) -> Result<()> {
        let rendered = Zeroizing::new(codec::render(&self.entries));
        write_atomic(&self.path, rendered.as_bytes())?;
        self.gateway
            .protect(&self.path, self.password.as_bytes())?;
        self.closed = true;

        for event in self.pending.drain(..) {
            self.audit.record(&event);
        }
        Ok(())
    }
}

impl Drop for OpenVault {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // Rollback: only re-protect if the file is still plaintext.
        if let Ok(false) = self.gateway.is_protected(&self.path) {
            let _ = self
                .gateway
                .protect(&self.path, self.password.as_bytes());
        }
    }
}

/// Validate that a username is safe to use in a file name.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty, must not start with a period, at most 64 chars.
pub fn validate_username(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::InvalidUsername(
            "username cannot be empty".into(),
        ));
    }

    if name.len() > 64 {
        return Err(VaultError::InvalidUsername(
            "username cannot exceed 64 characters".into(),
        ));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(VaultError::InvalidUsername(format!(
            "'{name}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }

    if name.starts_with('.') {
        return Err(VaultError::InvalidUsername(format!(
            "'{name}' cannot start with a period"
        )));
    }

    Ok(())
}

fn ensure_vault_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vaults(dir: &TempDir) -> CredentialVault {
        CredentialVault::new(
            dir.path().join("vaults"),
            CipherGateway::default(),
            AuditLog::new(dir.path().join("audit.log")),
        )
    }

    #[test]
    fn valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_smith-2").is_ok());
        assert!(validate_username("first.last").is_ok());
    }

    #[test]
    fn rejects_path_like_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("../etc").is_err());
        assert!(validate_username("a/b").is_err());
        assert!(validate_username(".hidden").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn vault_path_uses_username() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);
        assert_eq!(
            v.vault_path("alice").unwrap(),
            dir.path().join("vaults").join("alice_passwords.enc")
        );
    }

    #[test]
    fn create_rejects_weak_password_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);

        let err = v.create("alice", "abc123").unwrap_err();
        assert!(matches!(err, VaultError::WeakPassword));
        assert!(!v.exists("alice").unwrap());
    }

    #[test]
    fn audit_events_are_written_on_commit_only() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);
        v.create("alice", "Secret1!").unwrap();

        let mut session = v.open("alice", "Secret1!").unwrap();
        session.add("email", "alice@x.com").unwrap();
        let before = v.audit().read_recent(10, None).unwrap();
        assert_eq!(before.len(), 1);

        session.close().unwrap();
        let after = v.audit().read_recent(10, None).unwrap();
        assert_eq!(after[0].message, "Stored password for email under alice.");
    }

    #[test]
    fn dropped_session_logs_nothing() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);
        v.create("alice", "Secret1!").unwrap();

        {
            let mut session = v.open("alice", "Secret1!").unwrap();
            session.add("email", "alice@x.com").unwrap();
        }

        let records = v.audit().read_recent(10, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Account setup completed for alice.");
    }

    #[test]
    fn get_and_contains() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);
        v.create("alice", "Secret1!").unwrap();

        let mut session = v.open("alice", "Secret1!").unwrap();
        session.add("email", "alice@x.com").unwrap();
        assert!(session.contains("email"));
        assert_eq!(session.get("email"), Some("alice@x.com"));
        assert_eq!(session.get("Email"), None);
        assert_eq!(session.len(), 1);
        session.close().unwrap();
    }

    #[test]
    fn add_rejects_invalid_entries() {
        let dir = TempDir::new().unwrap();
        let v = vaults(&dir);
        v.create("alice", "Secret1!").unwrap();

        let mut session = v.open("alice", "Secret1!").unwrap();
        assert!(matches!(
            session.add("a:b", "x"),
            Err(VaultError::InvalidEntry(_))
        ));
        assert!(matches!(
            session.add("ok", "two\nlines"),
            Err(VaultError::InvalidEntry(_))
        ));
        assert!(session.is_empty());
        session.close().unwrap();
    }
}
