//! Audit log — append-only record of vault operations.
//!
//! Each event becomes one line in a plain text file:
//!
//! ```text
//! 2026-10-18T09:12:44Z: Stored password for email under alice.
//! ```
//!
//! Designed for graceful degradation: if the file can't be opened or
//! written to, operations silently continue without logging.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::Result;

/// A single line read back from the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// File-backed audit log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    /// Log to the text file at `path` (created on first write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every event.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Path of the backing file, if logging is enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record an event. Fire-and-forget: errors are silently ignored.
    pub fn record(&self, event: &str) {
        if let Some(path) = &self.path {
            let _ = append_line(path, event);
        }
    }

    /// Read back recent records, most recent first.
    ///
    /// - `limit`: maximum number of records to return.
    /// - `since`: if provided, only return records at or after this time.
    ///
    /// Lines that don't carry a parseable timestamp are skipped.
    pub fn read_recent(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuditRecord>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let mut records: Vec<AuditRecord> = content
            .lines()
            .filter_map(parse_line)
            .filter(|r| since.map_or(true, |ts| r.timestamp >= ts))
            .collect();

        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}

/// Parse one `<timestamp>: <message>` line.
pub fn parse_line(line: &str) -> Option<AuditRecord> {
    let (ts, message) = line.split_once(": ")?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    Some(AuditRecord {
        timestamp,
        message: message.to_string(),
    })
}

fn append_line(path: &Path, event: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    // One event per line, whatever the caller passed in.
    let event = event.replace(['\n', '\r'], " ");
    writeln!(file, "{now}: {event}")
}
