//! Authentication material for the Jira dispatcher.
//!
//! An execution context owns one [`Auth`] value; the dispatcher turns it into
//! an `Authorization` header on every request so that direct and
//! host-mediated calls authenticate the same way.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose;
use reqwest::header::HeaderValue;

/// Credentials attached to every request made through a context
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Auth {
  /// No `Authorization` header (e.g. the host injects its own)
  #[default]
  None,
  /// Atlassian account e-mail plus API token
  Basic { username: String, api_token: String },
  /// OAuth 2.0 or personal access token
  Bearer(String),
  /// Signed assertion used by Connect apps
  Jwt(String),
}

impl Auth {
  pub fn basic(username: impl Into<String>, api_token: impl Into<String>) -> Self {
    Auth::Basic {
      username: username.into(),
      api_token: api_token.into(),
    }
  }

  pub fn bearer(token: impl Into<String>) -> Self {
    Auth::Bearer(token.into())
  }

  pub fn jwt(token: impl Into<String>) -> Self {
    Auth::Jwt(token.into())
  }

  /// The `Authorization` header value, marked sensitive.
  ///
  /// Returns `None` for [`Auth::None`] or when a token contains bytes that
  /// cannot appear in a header.
  pub fn header_value(&self) -> Option<HeaderValue> {
    let raw = match self {
      Auth::None => return None,
      Auth::Basic { username, api_token } => {
        let encoded = general_purpose::STANDARD.encode(format!("{username}:{api_token}"));
        format!("Basic {encoded}")
      }
      Auth::Bearer(token) => format!("Bearer {token}"),
      Auth::Jwt(token) => format!("JWT {token}"),
    };

    let mut value = HeaderValue::from_str(&raw).ok()?;
    value.set_sensitive(true);
    Some(value)
  }

  /// Short name of the scheme, safe to log
  pub fn scheme(&self) -> &'static str {
    match self {
      Auth::None => "none",
      Auth::Basic { .. } => "basic",
      Auth::Bearer(_) => "bearer",
      Auth::Jwt(_) => "jwt",
    }
  }
}

impl fmt::Debug for Auth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Auth::None => f.write_str("Auth::None"),
      Auth::Basic { username, .. } => f
        .debug_struct("Auth::Basic")
        .field("username", username)
        .field("api_token", &"<redacted>")
        .finish(),
      Auth::Bearer(_) => f.write_str("Auth::Bearer(<redacted>)"),
      Auth::Jwt(_) => f.write_str("Auth::Jwt(<redacted>)"),
    }
  }
}
