//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::policy;
use crate::vault::CredentialVault;

/// Environment variable consulted before prompting for a master password.
const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: encrypted per-user password manager.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Encrypted per-user password manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (overrides `vault_dir` from .passvault.toml)
    #[arg(long, global = true, env = "PASSVAULT_DIR")]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up a new account
    Init {
        /// Account name
        username: String,
        /// Generate a strong master password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// Store a new password under a label
    Add {
        /// Account name
        username: String,
        /// Label for the password (e.g. email)
        label: String,
        /// Password to store (omit for interactive prompt)
        value: Option<String>,
        /// Generate a strong password instead of prompting
        #[arg(short, long, conflicts_with = "value")]
        generate: bool,
    },

    /// Retrieve all stored passwords
    List {
        /// Account name
        username: String,
    },

    /// Replace the password stored under a label
    Update {
        /// Account name
        username: String,
        /// Label of the password to update
        label: String,
        /// New password (omit for interactive prompt)
        value: Option<String>,
        /// Generate a strong password instead of prompting
        #[arg(short, long, conflicts_with = "value")]
        generate: bool,
    },

    /// Delete the password stored under a label
    Delete {
        /// Account name
        username: String,
        /// Label of the password to delete
        label: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Import passwords from an exported bundle
    Import {
        /// Path to the bundle file
        file: String,
    },

    /// Export all passwords to a plaintext bundle
    Export {
        /// Account name
        username: String,
        /// Output file path (default: <username>_passwords.txt)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// Print a generated strong password
    Generate,

    /// Re-encrypt a vault left in plaintext by an interrupted command
    Recover {
        /// Account name
        username: String,
    },

    /// View the audit log
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Build the `CredentialVault` for the current directory.
///
/// Settings come from `.passvault.toml`; `--vault-dir` wins over the file.
pub fn credential_vault(cli: &Cli) -> Result<CredentialVault> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    CredentialVault::from_settings(&cwd, &settings)
}

/// Get a master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(username: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Enter master password for {username}"))
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Re-prompts until the password meets the complexity policy.  A value
/// from `PASSVAULT_PASSWORD` is returned as-is; account creation checks it.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Set up your master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        let unmet = policy::unmet_requirements(&password);
        if !unmet.is_empty() {
            let missing: Vec<String> = unmet.iter().map(ToString::to_string).collect();
            output::warning(&format!(
                "Password does not meet complexity requirements (needs {}). Try again.",
                missing.join(", ")
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Determine the secret to store for `label`.
///
/// Sources, in order: generated, inline argument, piped stdin,
/// interactive prompt.
pub fn read_secret_value(
    label: &str,
    value: Option<&str>,
    generate: bool,
) -> Result<Zeroizing<String>> {
    if generate {
        return Ok(Zeroizing::new(policy::generate()));
    }

    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Enter the password to store for {label}"))
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_inline_value() {
        let cli = Cli::try_parse_from(["passvault", "add", "alice", "email", "a@x.com"]).unwrap();
        match cli.command {
            Commands::Add {
                username,
                label,
                value,
                generate,
            } => {
                assert_eq!(username, "alice");
                assert_eq!(label, "email");
                assert_eq!(value.as_deref(), Some("a@x.com"));
                assert!(!generate);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn generate_conflicts_with_value() {
        let result =
            Cli::try_parse_from(["passvault", "add", "alice", "email", "x", "--generate"]);
        assert!(result.is_err());
    }

    #[test]
    fn vault_dir_is_global() {
        let cli = Cli::try_parse_from(["passvault", "list", "alice", "--vault-dir", "/tmp/v"])
            .unwrap();
        assert_eq!(cli.vault_dir.as_deref(), Some("/tmp/v"));
    }

    #[test]
    fn generated_secret_value_is_strong() {
        let value = read_secret_value("email", None, true).unwrap();
        assert!(policy::is_strong(&value));
    }

    #[test]
    fn inline_secret_value_is_used() {
        let value = read_secret_value("email", Some("abc"), false).unwrap();
        assert_eq!(value.as_str(), "abc");
    }
}
