//! Line-oriented `label: value` codec for the decrypted vault view.
//!
//! Parsing is tolerant: lines that do not look like an entry are
//! dropped rather than treated as fatal.

use std::collections::HashSet;
use std::fmt::Write;

use super::entry::Entry;

/// Split one `label: value` line.
///
/// Returns `None` for lines without a `:` or with an empty label.
/// The label is trimmed; one space after the colon is dropped and the
/// rest of the value is kept verbatim.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (label, value) = line.split_once(':')?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let value = value.strip_prefix(' ').unwrap_or(value);
    Some((label, value))
}

/// Parse decrypted vault bytes into entries, preserving order.
///
/// If a label occurs more than once only the first occurrence is kept.
pub fn parse(bytes: &[u8]) -> Vec<Entry> {
    let text = String::from_utf8_lossy(bytes);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for line in text.lines() {
        if let Some((label, value)) = parse_line(line) {
            if seen.insert(label.to_string()) {
                entries.push(Entry::new(label, value));
            }
        }
    }

    entries
}

/// Render one entry line, including the trailing newline.
pub fn render_line(label: &str, secret: &str) -> String {
    format!("{label}: {secret}\n")
}

/// Render entries back into the `label: value` form.
pub fn render(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}: {}", entry.label, entry.secret);
    }
    out
}
