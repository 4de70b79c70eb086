//! Whole-file protection of vault files.
//!
//! A protected file has this layout:
//!
//! ```text
//! [PVLT: 4 bytes][version: 1 byte][iterations: 4 bytes LE][salt: 16 bytes][nonce: 12 bytes][ciphertext + tag]
//! ```
//!
//! `protect` turns a plaintext file into that envelope, `reveal` turns it
//! back.  Both write to a hidden sibling temp file and rename it over the
//! target, so an interrupted call never leaves a truncated file behind.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use zeroize::Zeroizing;

use super::encryption::{decrypt, encrypt};
use super::kdf::{derive_key, generate_salt, DEFAULT_ITERATIONS, MIN_ITERATIONS, SALT_LEN};
use crate::errors::CipherError;

/// Magic bytes at the start of every protected file.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current envelope version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (iterations) + salt.
const HEADER_LEN: usize = 9 + SALT_LEN;

/// Password-based encryption of whole files.
#[derive(Debug, Clone, Copy)]
pub struct CipherGateway {
    iterations: u32,
}

impl Default for CipherGateway {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl CipherGateway {
    /// Build a gateway that derives keys with `iterations` PBKDF2 rounds.
    pub fn new(iterations: u32) -> Result<Self, CipherError> {
        if iterations < MIN_ITERATIONS {
            return Err(CipherError::KeyDerivation(format!(
                "iteration count must be at least {MIN_ITERATIONS} (got {iterations})"
            )));
        }
        Ok(Self { iterations })
    }

    /// Iteration count used for newly protected files.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Encrypt `path` in place with a key derived from `password`.
    pub fn protect(&self, path: &Path, password: &[u8]) -> Result<(), CipherError> {
        if !path.exists() {
            return Err(CipherError::NotFound(path.to_path_buf()));
        }

        let plaintext = Zeroizing::new(fs::read(path)?);
        let sealed = self.seal(&plaintext, password)?;
        write_atomic(path, &sealed)?;
        Ok(())
    }

    /// Decrypt `path` in place.
    ///
    /// On a wrong password the file is left exactly as it was: the
    /// plaintext is only written once the auth tag has been verified.
    pub fn reveal(&self, path: &Path, password: &[u8]) -> Result<(), CipherError> {
        if !path.exists() {
            return Err(CipherError::NotFound(path.to_path_buf()));
        }

        let data = fs::read(path)?;
        if !is_envelope(&data) {
            return Err(CipherError::NotProtected(path.to_path_buf()));
        }

        let plaintext = self.unseal(&data, password)?;
        write_atomic(path, &plaintext)?;
        Ok(())
    }

    /// Encrypt `plaintext` into a self-describing envelope.
    pub fn seal(&self, plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, CipherError> {
        let salt = generate_salt();
        let key = derive_key(password, &salt, self.iterations)?;
        let body = encrypt(&key[..], plaintext)?;

        let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(ENVELOPE_VERSION);
        buf.extend_from_slice(&self.iterations.to_le_bytes());
        buf.extend_from_slice(&salt);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decrypt an envelope produced by `seal`.
    ///
    /// The salt and iteration count come from the envelope, not from
    /// this gateway, so files stay readable after the configured
    /// iteration count changes.
    pub fn unseal(&self, data: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        if !is_envelope(data) {
            return Err(CipherError::Malformed("missing PVLT magic bytes".into()));
        }
        if data.len() < HEADER_LEN {
            return Err(CipherError::Malformed("envelope header truncated".into()));
        }

        let version = data[4];
        if version != ENVELOPE_VERSION {
            return Err(CipherError::Malformed(format!(
                "unsupported version {version}, expected {ENVELOPE_VERSION}"
            )));
        }

        let iterations = u32::from_le_bytes(
            data[5..9]
                .try_into()
                .map_err(|_| CipherError::Malformed("bad iteration field".into()))?,
        );
        let salt = &data[9..HEADER_LEN];

        let key = derive_key(password, salt, iterations)
            .map_err(|e| CipherError::Malformed(format!("stored KDF parameters: {e}")))?;
        let plaintext = decrypt(&key[..], &data[HEADER_LEN..])?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Returns `true` if the file at `path` starts with the envelope magic.
    pub fn is_protected(&self, path: &Path) -> Result<bool, CipherError> {
        if !path.exists() {
            return Err(CipherError::NotFound(path.to_path_buf()));
        }

        let mut head = Vec::with_capacity(MAGIC.len());
        fs::File::open(path)?
            .take(MAGIC.len() as u64)
            .read_to_end(&mut head)?;
        Ok(is_envelope(&head))
    }
}

/// Returns `true` if `data` begins with the envelope magic bytes.
pub fn is_envelope(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && &data[..MAGIC.len()] == MAGIC
}

/// Write `bytes` to `path` via a temp file in the same directory.
///
/// The temp file is in the same directory so the rename is atomic on
/// the same filesystem.  On Unix both files are owner-only.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = (|| -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
