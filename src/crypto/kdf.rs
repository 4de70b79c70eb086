//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! Every protect call draws a fresh random salt; the salt and the
//! iteration count travel in the vault envelope so `reveal` can derive
//! the same key later.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::CipherError;

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Lowest iteration count we will derive a key with.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Upper bound accepted from an envelope header.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Iteration count used when nothing is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and salt.
///
/// The key is returned in a `Zeroizing` wrapper so it is wiped on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(CipherError::KeyDerivation(format!(
            "iteration count must be between {MIN_ITERATIONS} and {MAX_ITERATIONS} (got {iterations})"
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut key[..])
        .map_err(|e| CipherError::KeyDerivation(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
