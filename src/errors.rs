use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the cipher layer (`crypto::CipherGateway`).
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Authentication failed — wrong password or corrupted data")]
    AuthenticationFailure,

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File at {0} is not protected (no vault envelope)")]
    NotProtected(PathBuf),

    #[error("Malformed vault envelope: {0}")]
    Malformed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Account errors ---
    #[error("Account '{0}' already exists")]
    AlreadyExists(String),

    #[error("No account found for '{0}'")]
    NotFound(String),

    #[error("Invalid master password")]
    WrongPassword,

    #[error(
        "Password does not meet complexity requirements — it must have at least 6 characters, one capital letter, one number, and one special character"
    )]
    WeakPassword,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Vault file at {0} is not encrypted — run `passvault recover` to protect it")]
    Unprotected(PathBuf),

    // --- Entry errors ---
    #[error("The label '{0}' already exists")]
    DuplicateLabel(String),

    #[error("No password found for the label '{0}'")]
    LabelNotFound(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    // --- Bundle errors ---
    #[error("Malformed bundle: {0}")]
    MalformedBundle(String),

    // --- Crypto errors ---
    #[error("Cipher error: {0}")]
    Cipher(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl From<CipherError> for VaultError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::AuthenticationFailure => VaultError::WrongPassword,
            CipherError::NotProtected(path) => VaultError::Unprotected(path),
            CipherError::Io(e) => VaultError::Io(e),
            CipherError::NotFound(path) => VaultError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
            other => VaultError::Cipher(other.to_string()),
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
