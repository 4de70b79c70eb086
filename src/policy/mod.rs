//! Master-password complexity policy and password generation.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

/// Minimum number of characters in a master password.
pub const MIN_LENGTH: usize = 6;

/// Number of random bytes behind each generated password.
const GENERATED_BYTES: usize = 12;

/// Literal suffix that makes every generated password pass `is_strong`.
const GENERATED_SUFFIX: &str = "0A!";

/// One complexity rule a password can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    MinLength,
    Uppercase,
    Digit,
    Special,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::MinLength => write!(f, "at least {MIN_LENGTH} characters"),
            Requirement::Uppercase => write!(f, "one capital letter"),
            Requirement::Digit => write!(f, "one number"),
            Requirement::Special => write!(f, "one special character"),
        }
    }
}

/// The rules `password` does not satisfy, in a stable order.
pub fn unmet_requirements(password: &str) -> Vec<Requirement> {
    let mut unmet = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        unmet.push(Requirement::MinLength);
    }
    if !password.chars().any(char::is_uppercase) {
        unmet.push(Requirement::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        unmet.push(Requirement::Digit);
    }
    if password.chars().all(char::is_alphanumeric) {
        unmet.push(Requirement::Special);
    }

    unmet
}

/// Returns `true` if `password` may be used as a master password.
pub fn is_strong(password: &str) -> bool {
    unmet_requirements(password).is_empty()
}

/// Generate a strong password.
///
/// The randomness comes from the CSPRNG bytes alone.  The ROT13 pass
/// over the base64 text only changes how the password looks.
pub fn generate() -> String {
    let mut bytes = [0u8; GENERATED_BYTES];
    rand::rng().fill_bytes(&mut bytes);

    let encoded = rot13(&BASE64.encode(bytes));
    format!("{}{GENERATED_SUFFIX}", encoded.trim_end_matches('='))
}

/// Rotate ASCII letters by 13 places; everything else is unchanged.
pub fn rot13(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
            'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
            _ => c,
        })
        .collect()
}
