//! Vault module — per-account encrypted credential storage.
//!
//! This module provides:
//! - The `Entry` type and its validation rules (`entry`)
//! - The `label: value` line codec (`codec`)
//! - `CredentialVault` and the `OpenVault` session handle (`store`)

pub mod codec;
pub mod entry;
pub mod store;

// Re-export the most commonly used items.
pub use entry::Entry;
pub use store::{CredentialVault, OpenVault};
