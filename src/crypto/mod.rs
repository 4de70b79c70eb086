//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The whole-file `CipherGateway` that protects and reveals vault files (`gateway`)

pub mod encryption;
pub mod gateway;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherGateway, encrypt, decrypt, ...};
pub use encryption::{decrypt, encrypt};
pub use gateway::{is_envelope, CipherGateway};
pub use kdf::{derive_key, generate_salt, DEFAULT_ITERATIONS, MIN_ITERATIONS};
