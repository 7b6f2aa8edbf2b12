//! Reading and writing `.netrc` entries.
//!
//! The parser is token based, so single-line
//! (`machine host login user password pass`) and multi-line entries can be
//! mixed freely in one file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file in `home`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sprig_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

#[derive(Default)]
struct Entry {
  machine: Option<String>,
  login: Option<String>,
  password: Option<String>,
}

impl Entry {
  fn into_credentials(self) -> Option<Credentials> {
    match (self.login, self.password) {
      (Some(username), Some(password)) => Some(Credentials { username, password }),
      _ => None,
    }
  }
}

fn parse_entries(content: &str) -> Vec<Entry> {
  let mut entries = Vec::new();
  let mut current: Option<Entry> = None;
  let mut tokens = content.split_whitespace();

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        entries.extend(current.take());
        current = Some(Entry {
          machine: tokens.next().map(str::to_string),
          ..Entry::default()
        });
      }
      "default" => {
        entries.extend(current.take());
        current = Some(Entry::default());
      }
      "login" | "password" | "account" | "port" => {
        let value = tokens.next().map(str::to_string);
        if let Some(entry) = current.as_mut() {
          match token {
            "login" => entry.login = value,
            "password" => entry.password = value,
            _ => {}
          }
        }
      }
      _ => {}
    }
  }
  entries.extend(current);
  entries
}

/// Parses a `.netrc` file and returns credentials for `target_machine`.
///
/// `Ok(None)` means the machine is absent or its entry lacks a login or
/// password.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

  Ok(
    parse_entries(&content)
      .into_iter()
      .find(|entry| entry.machine.as_deref() == Some(target_machine))
      .and_then(Entry::into_credentials),
  )
}

/// Writes or replaces the entry for `machine`.
///
/// Lines belonging to other machines are preserved. On Unix the file mode is
/// tightened to `600`.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let existing = if path.exists() {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
  } else {
    String::new()
  };

  let entry = format!("machine {machine}\n  login {username}\n  password {password}\n");
  let mut output = String::with_capacity(existing.len() + entry.len());
  let mut replaced = false;
  let mut skipping = false;

  for line in existing.lines() {
    let mut words = line.split_whitespace();
    let first = words.next();
    if matches!(first, Some("machine") | Some("default")) {
      skipping = first == Some("machine") && words.next() == Some(machine);
      if skipping && !replaced {
        output.push_str(&entry);
        replaced = true;
      }
    }
    if !skipping {
      output.push_str(line);
      output.push('\n');
    }
  }

  if !replaced {
    if !output.is_empty() && !output.ends_with("\n\n") {
      output.push('\n');
    }
    output.push_str(&entry);
  }

  fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
  set_secure_permissions(path)
}

#[cfg(unix)]
fn set_secure_permissions(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o600))
    .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_secure_permissions(_path: &Path) -> Result<()> {
  Ok(())
}

/// Whether the file is readable only by its owner.
///
/// Always `true` on platforms without Unix permissions.
pub fn has_secure_permissions(path: &Path) -> Result<bool> {
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)
      .with_context(|| format!("Failed to read metadata for {}", path.display()))?
      .permissions()
      .mode();
    Ok(mode & 0o077 == 0)
  }

  #[cfg(not(unix))]
  {
    let _ = path;
    Ok(true)
  }
}

/// Reduce a Jira URL to the bare host used as a `.netrc` machine name.
///
/// ```
/// use sprig_core::creds::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("http://jira.example.com"), "jira.example.com");
/// assert_eq!(normalize_host("my-jira-instance.com"), "my-jira-instance.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  let trimmed = raw_host.trim();
  let without_scheme = trimmed
    .split_once("://")
    .map(|(_, rest)| rest)
    .unwrap_or(trimmed);
  without_scheme
    .split('/')
    .next()
    .unwrap_or_default()
    .to_ascii_lowercase()
}
