//! # Credential Management
//!
//! Jira credentials are read from the user's `.netrc`. A site-specific entry
//! wins; Atlassian Cloud users may instead keep a single `atlassian.net`
//! entry shared by every `*.atlassian.net` site. Other hosts never use it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

pub mod netrc;

pub use netrc::{normalize_host, parse_netrc_file, write_netrc_entry};

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Machine name used as a fallback for every Atlassian Cloud site
pub const ATLASSIAN_FALLBACK_MACHINE: &str = "atlassian.net";

/// Whether `host` is an Atlassian Cloud site that may use the shared entry
pub fn is_atlassian_cloud_host(host: &str) -> bool {
  let host = normalize_host(host);
  let name = host.split(':').next().unwrap_or_default();
  name.ends_with(".atlassian.net")
}

/// The current user's home directory
pub fn home_dir() -> Result<PathBuf> {
  let base_dirs = BaseDirs::new().context("Could not determine the home directory")?;
  Ok(base_dirs.home_dir().to_path_buf())
}

/// Look up Jira credentials for `jira_host` in `<home>/.netrc`.
///
/// Returns `Ok(None)` when the file or a usable entry is missing.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Option<Credentials>> {
  let netrc_path = netrc::get_netrc_path(home);
  if !netrc_path.exists() {
    return Ok(None);
  }

  let host = normalize_host(jira_host);
  if let Some(creds) = parse_netrc_file(&netrc_path, &host)? {
    return Ok(Some(creds));
  }

  if host == ATLASSIAN_FALLBACK_MACHINE || !is_atlassian_cloud_host(&host) {
    return Ok(None);
  }

  parse_netrc_file(&netrc_path, ATLASSIAN_FALLBACK_MACHINE)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn home_with_netrc(content: &str) -> TempDir {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".netrc"), content).unwrap();
    home
  }

  #[test]
  fn test_site_entry_wins_over_fallback() {
    let home = home_with_netrc(
      "machine atlassian.net login shared@example.com password shared\n\
       machine acme.atlassian.net login acme@example.com password acme-token\n",
    );

    let creds = get_jira_credentials(home.path(), "https://acme.atlassian.net/").unwrap().unwrap();
    assert_eq!(creds.username, "acme@example.com");
    assert_eq!(creds.password, "acme-token");
  }

  #[test]
  fn test_falls_back_to_atlassian_entry() {
    let home = home_with_netrc("machine atlassian.net\n  login shared@example.com\n  password shared\n");

    let creds = get_jira_credentials(home.path(), "other.atlassian.net").unwrap().unwrap();
    assert_eq!(creds.username, "shared@example.com");
  }

  #[test]
  fn test_self_hosted_jira_ignores_atlassian_entry() {
    let home = home_with_netrc("machine atlassian.net login shared@example.com password shared\n");

    assert!(get_jira_credentials(home.path(), "https://jira.example.com").unwrap().is_none());
    assert!(get_jira_credentials(home.path(), "jira.example.com:8443").unwrap().is_none());
    assert!(get_jira_credentials(home.path(), "evilatlassian.net").unwrap().is_none());
    assert!(get_jira_credentials(home.path(), "acme.atlassian.net:443").unwrap().is_some());
  }

  #[test]
  fn test_is_atlassian_cloud_host() {
    assert!(is_atlassian_cloud_host("https://acme.atlassian.net/"));
    assert!(is_atlassian_cloud_host("ACME.Atlassian.net"));
    assert!(!is_atlassian_cloud_host("atlassian.net"));
    assert!(!is_atlassian_cloud_host("jira.example.com"));
    assert!(!is_atlassian_cloud_host("acme.atlassian.net.example.com"));
  }

  #[test]
  fn test_missing_netrc_is_none() {
    let home = TempDir::new().unwrap();
    assert!(get_jira_credentials(home.path(), "acme.atlassian.net").unwrap().is_none());
  }

  #[test]
  fn test_no_matching_entry_is_none() {
    let home = home_with_netrc("machine github.com login me password token\n");
    assert!(get_jira_credentials(home.path(), "jira.example.com").unwrap().is_none());
  }
}
