//! `passvault generate` — print a strong password.

use crate::errors::Result;
use crate::policy;

/// Execute the `generate` command.
pub fn execute() -> Result<()> {
    println!("{}", policy::generate());
    Ok(())
}
