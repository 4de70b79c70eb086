//! `passvault audit` — display the audit log.
//!
//! Usage:
//!   passvault audit               # show last 50 entries
//!   passvault audit --last 20     # show last 20
//!   passvault audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::AuditRecord;
use crate::cli::output;
use crate::cli::{credential_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let vaults = credential_vault(cli)?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let records = vaults.audit().read_recent(last, since_dt)?;

    if records.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&records);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(VaultError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        _ => chrono::Duration::minutes(num),
    };

    Ok(Utc::now() - duration)
}

/// Print audit records in a formatted table.
pub fn print_audit_table(records: &[AuditRecord]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Event"]);

    for record in records {
        let time = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        table.add_row(vec![time, colorize_event(&record.message)]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", records.len())).bold()
    );
    println!("{table}");
}

/// Colorize events by the kind of operation they describe.
fn colorize_event(message: &str) -> String {
    use console::style;

    let verb = message.split_whitespace().next().unwrap_or_default();
    match verb {
        "Account" => style(message).green().to_string(),
        "Stored" | "Updated" => style(message).blue().to_string(),
        "Deleted" => style(message).red().to_string(),
        "Imported" | "Exported" => style(message).cyan().to_string(),
        "Re-protected" => style(message).yellow().to_string(),
        _ => message.to_string(),
    }
}
