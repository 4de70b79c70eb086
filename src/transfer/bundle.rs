//! Portable plaintext bundle.
//!
//! ```text
//! username: alice
//! master_password: Secret1!
//! email: alice@x.com
//! bank: 1234
//! ```
//!
//! Header lines are recognised by their literal prefix; every other
//! line is a candidate entry and goes through the tolerant line parser.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};
use crate::vault::codec;
use crate::vault::entry::RESERVED_LABELS;
use crate::vault::Entry;

/// Prefix of the header line naming the account.
pub const USERNAME_HEADER: &str = "username:";

/// Prefix of the header line carrying the master password.
pub const PASSWORD_HEADER: &str = "master_password:";

/// A vault's entries together with the credentials that open it.
pub struct PortableBundle {
    pub username: String,
    pub master_password: Zeroizing<String>,
    pub entries: Vec<Entry>,
}

impl fmt::Debug for PortableBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortableBundle")
            .field("username", &self.username)
            .field("master_password", &"<redacted>")
            .field("entries", &self.entries)
            .finish()
    }
}

impl PortableBundle {
    pub fn new(username: &str, master_password: &str, entries: Vec<Entry>) -> Self {
        Self {
            username: username.to_string(),
            master_password: Zeroizing::new(master_password.to_string()),
            entries,
        }
    }

    /// Default export file name for `username`.
    pub fn default_file_name(username: &str) -> String {
        format!("{username}_passwords.txt")
    }

    /// Render the two header lines followed by one line per entry.
    pub fn render(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::new());
        out.push_str(&format!("{USERNAME_HEADER} {}\n", self.username));
        out.push_str(&format!(
            "{PASSWORD_HEADER} {}\n",
            self.master_password.as_str()
        ));
        out.push_str(&codec::render(&self.entries));
        out
    }

    /// Parse bundle text.
    ///
    /// The first `username:` and `master_password:` lines win; later
    /// header lines are ignored.  Lines that aren't `label: value` are
    /// skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut username: Option<String> = None;
        let mut master_password: Option<Zeroizing<String>> = None;
        let mut entries = Vec::new();

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if let Some(value) = line.strip_prefix(USERNAME_HEADER) {
                if username.is_none() {
                    username = Some(value.trim().to_string());
                }
                continue;
            }
            if let Some(value) = line.strip_prefix(PASSWORD_HEADER) {
                if master_password.is_none() {
                    let value = value.strip_prefix(' ').unwrap_or(value);
                    master_password = Some(Zeroizing::new(value.to_string()));
                }
                continue;
            }

            if let Some((label, secret)) = codec::parse_line(line) {
                entries.push(Entry::new(label, secret));
            }
        }

        let username = username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VaultError::MalformedBundle("missing `username:` header".into()))?;
        let master_password = master_password.ok_or_else(|| {
            VaultError::MalformedBundle("missing `master_password:` header".into())
        })?;

        Ok(Self {
            username,
            master_password,
            entries,
        })
    }

    /// Read and parse a bundle file.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VaultError::CommandFailed(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        let text = Zeroizing::new(fs::read_to_string(path)?);
        Self::parse(&text)
    }

    /// Fail early if `write_to(path, overwrite)` would refuse `path`.
    pub fn check_destination(path: &Path, overwrite: bool) -> Result<()> {
        if !overwrite && path.exists() {
            return Err(refuse_overwrite(path));
        }
        Ok(())
    }

    /// Fail if an entry would read back as a header line.
    ///
    /// Vault files written before label validation existed can still
    /// carry such labels.
    pub fn check_exportable(&self) -> Result<()> {
        match self
            .entries
            .iter()
            .find(|e| RESERVED_LABELS.contains(&e.label.as_str()))
        {
            Some(e) => Err(VaultError::InvalidEntry(format!(
                "label '{}' collides with a bundle header; rename or delete it before exporting",
                e.label
            ))),
            None => Ok(()),
        }
    }

    /// Write the bundle to `path` with owner-only permissions.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub fn write_to(&self, path: &Path, overwrite: bool) -> Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => refuse_overwrite(path),
            _ => VaultError::Io(e),
        })?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn refuse_overwrite(path: &Path) -> VaultError {
    VaultError::CommandFailed(format!(
        "refusing to overwrite existing file {} (use --force)",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PortableBundle {
        PortableBundle::new(
            "alice",
            "Secret1!",
            vec![
                Entry::new("email", "alice@x.com"),
                Entry::new("db", "postgres://u:p@h"),
            ],
        )
    }

    #[test]
    fn render_layout() {
        assert_eq!(
            sample().render().as_str(),
            "username: alice\nmaster_password: Secret1!\nemail: alice@x.com\ndb: postgres://u:p@h\n"
        );
    }

    #[test]
    fn parse_reads_headers_and_entries() {
        let bundle = PortableBundle::parse(&sample().render()).unwrap();
        assert_eq!(bundle.username, "alice");
        assert_eq!(bundle.master_password.as_str(), "Secret1!");
        assert_eq!(bundle.entries, sample().entries);
    }

    #[test]
    fn parse_headers_in_any_order_and_skips_noise() {
        let text = "junk line\nmaster_password: P@ss word1\nusername: bob\nsite: x\n\n";
        let bundle = PortableBundle::parse(text).unwrap();
        assert_eq!(bundle.username, "bob");
        assert_eq!(bundle.master_password.as_str(), "P@ss word1");
        assert_eq!(bundle.entries, vec![Entry::new("site", "x")]);
    }

    #[test]
    fn first_header_wins() {
        let text = "username: alice\nmaster_password: One1!!\nusername: mallory\n";
        let bundle = PortableBundle::parse(text).unwrap();
        assert_eq!(bundle.username, "alice");
        assert!(bundle.entries.is_empty());
    }

    #[test]
    fn missing_headers_are_malformed() {
        assert!(matches!(
            PortableBundle::parse("master_password: x\nemail: y\n"),
            Err(VaultError::MalformedBundle(_))
        ));
        assert!(matches!(
            PortableBundle::parse("username: alice\n"),
            Err(VaultError::MalformedBundle(_))
        ));
        assert!(matches!(
            PortableBundle::parse("username:   \nmaster_password: x\n"),
            Err(VaultError::MalformedBundle(_))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let shown = format!("{:?}", sample());
        assert!(!shown.contains("Secret1!"));
        assert!(!shown.contains("alice@x.com"));
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PortableBundle::default_file_name("alice"));

        sample().write_to(&path, false).unwrap();
        let back = PortableBundle::read_from(&path).unwrap();
        assert_eq!(back.entries, sample().entries);
    }

    #[test]
    fn write_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "keep me").unwrap();

        assert!(sample().write_to(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        sample().write_to(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("username: alice"));
    }

    #[test]
    fn reserved_labels_match_headers() {
        for label in RESERVED_LABELS {
            let line = format!("{label}: x");
            assert!(line.starts_with(USERNAME_HEADER) || line.starts_with(PASSWORD_HEADER));
        }
    }

    #[test]
    fn export_check_rejects_header_labels() {
        let bundle = PortableBundle::new(
            "alice",
            "Secret1!",
            vec![Entry::new("email", "a"), Entry::new("username", "alice@corp")],
        );
        assert!(matches!(
            bundle.check_exportable(),
            Err(VaultError::InvalidEntry(_))
        ));
        assert!(sample().check_exportable().is_ok());
    }

    #[test]
    fn check_destination_mirrors_write_to() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        assert!(PortableBundle::check_destination(&path, false).is_ok());

        fs::write(&path, "keep me").unwrap();
        assert!(matches!(
            PortableBundle::check_destination(&path, false),
            Err(VaultError::CommandFailed(_))
        ));
        assert!(PortableBundle::check_destination(&path, true).is_ok());
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(PortableBundle::read_from(&dir.path().join("nope.txt")).is_err());
    }
}
