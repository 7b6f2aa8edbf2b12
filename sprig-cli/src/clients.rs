//! # Client Creation
//!
//! Turns command-line flags, the configuration file and `.netrc` into one
//! [`ExecutionContext`], and wraps it in a [`JiraClient`].

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use sprig_core::creds::{Credentials, get_jira_credentials, is_atlassian_cloud_host, normalize_host};
use sprig_core::{AuthMode, SprigConfig, resolve_jira_base_url};
use sprig_jira::consts::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use sprig_jira::{Auth, ExecutionContext, JiraClient};
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Connection overrides taken from global command-line flags
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
  pub host: Option<String>,
  pub timeout_secs: Option<u64>,
  pub bearer_token: Option<String>,
}

/// Pick the authentication scheme.
///
/// An explicit bearer token wins. Otherwise the `.netrc` entry for the host
/// supplies either basic credentials or, in bearer mode, the token as its
/// password.
pub fn resolve_auth(options: &ConnectionOptions, config: &SprigConfig, home: &Path, base_url: &str) -> Result<Auth> {
  if let Some(token) = &options.bearer_token {
    debug!("Using bearer token from the command line");
    return Ok(Auth::bearer(token.clone()));
  }

  let host = normalize_host(base_url);
  let Some(Credentials { username, password }) = get_jira_credentials(home, &host)? else {
    let shared = if is_atlassian_cloud_host(&host) {
      " (or 'machine atlassian.net')"
    } else {
      ""
    };
    bail!(
      "No Jira credentials found for '{host}'. Add a 'machine {host}'{shared} entry to ~/.netrc, or pass \
       --bearer-token. Run `sprig creds check` for details"
    );
  };

  Ok(match config.jira.auth_mode {
    AuthMode::Basic => Auth::basic(username, password),
    AuthMode::Bearer => Auth::bearer(password),
  })
}

/// Build the direct execution context the CLI dispatches through
pub fn build_context(options: &ConnectionOptions, config: &SprigConfig, home: &Path) -> Result<ExecutionContext> {
  let base_url = resolve_jira_base_url(options.host.as_deref(), &config.jira)?;
  let auth = resolve_auth(options, config, home, &base_url)?;

  let timeout = options
    .timeout_secs
    .or(config.jira.timeout_secs)
    .map(Duration::from_secs)
    .unwrap_or(DEFAULT_TIMEOUT);
  let connect_timeout = config
    .jira
    .connect_timeout_secs
    .map(Duration::from_secs)
    .unwrap_or(DEFAULT_CONNECT_TIMEOUT);

  info!(base_url = %base_url, auth = auth.scheme(), timeout_secs = timeout.as_secs(), "Connecting to Jira");

  ExecutionContext::direct(base_url.as_str())
    .auth(auth)
    .timeout(timeout)
    .connect_timeout(connect_timeout)
    .build()
    .with_context(|| format!("Failed to configure Jira client for {base_url}"))
}

/// Creates an authenticated Jira client from flags, config and `.netrc`
pub fn create_jira_client(options: &ConnectionOptions, config: &SprigConfig, home: &Path) -> Result<JiraClient> {
  Ok(JiraClient::from_context(build_context(options, config, home)?))
}

/// Creates a tokio runtime and an authenticated Jira client
///
/// This is a convenience function for CLI commands that need both a runtime
/// and a Jira client.
pub fn create_jira_runtime_and_client(options: &ConnectionOptions) -> Result<(Runtime, JiraClient)> {
  let config = sprig_core::get_config_dirs()?.load_config()?;
  let home = sprig_core::creds::home_dir()?;

  let client = create_jira_client(options, &config, &home)?;
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, client))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use sprig_core::ENV_JIRA_HOST;
  use sprig_core::config::JiraSettings;
  use sprig_test_utils::EnvVarGuard;
  use tempfile::TempDir;

  use super::*;

  fn home_with_netrc(content: &str) -> TempDir {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".netrc"), content).unwrap();
    home
  }

  fn config_for(host: &str, auth_mode: AuthMode) -> SprigConfig {
    SprigConfig {
      jira: JiraSettings {
        host: Some(host.to_string()),
        auth_mode,
        ..JiraSettings::default()
      },
    }
  }

  #[test]
  fn test_bearer_flag_skips_netrc() {
    let home = TempDir::new().unwrap();
    let options = ConnectionOptions {
      bearer_token: Some("pat".to_string()),
      ..ConnectionOptions::default()
    };

    let auth = resolve_auth(&options, &SprigConfig::default(), home.path(), "https://acme.atlassian.net").unwrap();
    assert_eq!(auth, Auth::bearer("pat"));
  }

  #[test]
  fn test_basic_auth_from_netrc() {
    let home = home_with_netrc("machine acme.atlassian.net login me@example.com password token\n");
    let config = config_for("acme.atlassian.net", AuthMode::Basic);

    let auth = resolve_auth(&ConnectionOptions::default(), &config, home.path(), "https://acme.atlassian.net").unwrap();
    assert_eq!(auth, Auth::basic("me@example.com", "token"));
  }

  #[test]
  fn test_bearer_mode_uses_netrc_password() {
    let home = home_with_netrc("machine jira.example.com login ignored password pat-123\n");
    let config = config_for("jira.example.com", AuthMode::Bearer);

    let auth = resolve_auth(&ConnectionOptions::default(), &config, home.path(), "https://jira.example.com").unwrap();
    assert_eq!(auth, Auth::bearer("pat-123"));
  }

  #[test]
  fn test_self_hosted_jira_skips_shared_cloud_entry() {
    let home = home_with_netrc("machine atlassian.net login shared@example.com password cloud-token\n");
    let config = config_for("jira.example.com", AuthMode::Basic);

    let err = resolve_auth(&ConnectionOptions::default(), &config, home.path(), "https://jira.example.com").unwrap_err();

    let message = err.to_string();
    assert!(message.contains("'machine jira.example.com'"));
    assert!(!message.contains("atlassian.net"));
  }

  #[test]
  fn test_missing_credentials_explain_fix() {
    let home = TempDir::new().unwrap();
    let err = resolve_auth(
      &ConnectionOptions::default(),
      &SprigConfig::default(),
      home.path(),
      "https://acme.atlassian.net",
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("acme.atlassian.net"));
    assert!(message.contains("--bearer-token"));
  }

  #[test]
  fn test_build_context_applies_host_and_timeout() {
    let env = EnvVarGuard::new(ENV_JIRA_HOST);
    env.remove();
    let home = home_with_netrc("machine atlassian.net login me password token\n");
    let config = SprigConfig {
      jira: JiraSettings {
        host: Some("acme.atlassian.net".to_string()),
        timeout_secs: Some(90),
        ..JiraSettings::default()
      },
    };
    let options = ConnectionOptions {
      timeout_secs: Some(5),
      ..ConnectionOptions::default()
    };

    let context = build_context(&options, &config, home.path()).unwrap();
    assert_eq!(context.label(), "direct");
    assert_eq!(context.timeout(), Duration::from_secs(5));
    assert_eq!(context.auth().scheme(), "basic");
    match context {
      ExecutionContext::Direct(direct) => assert_eq!(direct.base_url(), "https://acme.atlassian.net"),
      ExecutionContext::Host(_) => panic!("expected a direct context"),
    }
  }

  #[test]
  fn test_build_context_without_host_fails() {
    let env = EnvVarGuard::new(ENV_JIRA_HOST);
    env.remove();
    let home = TempDir::new().unwrap();

    let err = build_context(&ConnectionOptions::default(), &SprigConfig::default(), home.path()).unwrap_err();
    assert!(err.to_string().contains("No Jira host configured"));
  }
}
