//! Jira site URL handling.
//!
//! Users type hosts loosely (`acme.atlassian.net`, `http:/jira.local`), so
//! everything is normalized to `scheme://host[:port][/path]` before it reaches
//! the dispatcher.

use anyhow::{Context, Result, bail};
use url::Url;

use crate::config::JiraSettings;

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Pick the Jira base URL: the explicit flag, then `$JIRA_HOST`, then the
/// configuration file.
pub fn resolve_jira_base_url(flag: Option<&str>, settings: &JiraSettings) -> Result<String> {
  let env_host = std::env::var(ENV_JIRA_HOST).ok().filter(|host| !host.trim().is_empty());

  let host = flag
    .map(str::to_string)
    .or(env_host)
    .or_else(|| settings.host.clone())
    .with_context(|| {
      format!("No Jira host configured. Pass --host, set ${ENV_JIRA_HOST}, or run `sprig config set --host <url>`")
    })?;

  ensure_url_scheme(&host)
}

/// Split a user-supplied scheme off `input`, tolerating missing slashes.
fn split_scheme(input: &str) -> (Option<String>, &str) {
  match input.split_once(':') {
    Some((scheme, rest))
      if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()) && !rest.starts_with(|c: char| c.is_ascii_digit()) =>
    {
      (Some(scheme.to_ascii_lowercase()), rest.trim_start_matches('/'))
    }
    _ => (None, input),
  }
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// Hosts without a scheme get `https://`. Malformed schemes such as
/// `http:/example.com` are repaired. Any trailing slash is dropped so the
/// result can be used as a base URL directly.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    bail!("Host cannot be empty");
  }

  let (scheme, rest) = split_scheme(trimmed);
  let scheme = match scheme.as_deref() {
    None => "https",
    Some(s @ ("http" | "https")) => s,
    Some(other) => bail!("Unsupported URL scheme '{other}' in '{input}'. Use http or https"),
  };
  if rest.is_empty() {
    bail!("Host cannot be empty");
  }

  let url = Url::parse(&format!("{scheme}://{rest}")).with_context(|| format!("Failed to parse URL: '{input}'"))?;
  if url.host_str().is_none_or(str::is_empty) {
    bail!("URL '{input}' has no host");
  }

  Ok(url.as_str().trim_end_matches('/').to_string())
}
