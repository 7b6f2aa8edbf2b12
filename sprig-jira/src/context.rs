//! # Execution Contexts
//!
//! A context decides how a prepared request leaves the process. The direct
//! context owns a pooled `reqwest` client and talks HTTP itself; the host
//! context hands the request to an embedding host through a [`HostBridge`]
//! and waits for the raw response. Everything else (templating, headers,
//! classification) is shared by the dispatcher.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::auth::Auth;
use crate::consts::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT, USER_AGENT};
use crate::error::{ConfigError, TransportError};
use crate::transport::{self, PreparedRequest, RawResponse};

/// Bridge to a host that performs HTTP on our behalf.
///
/// The host receives the fully prepared request (method, path relative to
/// the Jira site, query pairs, merged headers, body) and returns the raw
/// status, headers and body. Failures that happen before a response exists
/// are reported as [`TransportError`]s.
#[async_trait]
pub trait HostBridge: Send + Sync {
  async fn forward(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

/// Talks to Jira directly over HTTP
#[derive(Clone)]
pub struct DirectContext {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: Auth,
  pub(crate) default_headers: HeaderMap,
  pub(crate) timeout: Duration,
}

impl DirectContext {
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub(crate) async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
    transport::send_direct(&self.client, &self.base_url, request).await
  }
}

impl fmt::Debug for DirectContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DirectContext")
      .field("base_url", &self.base_url)
      .field("auth", &self.auth)
      .field("timeout", &self.timeout)
      .finish_non_exhaustive()
  }
}

/// Delegates I/O to an embedding host
#[derive(Clone)]
pub struct HostContext {
  pub(crate) bridge: Arc<dyn HostBridge>,
  pub(crate) auth: Auth,
  pub(crate) default_headers: HeaderMap,
  pub(crate) timeout: Duration,
}

impl HostContext {
  pub(crate) async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
    transport::with_timeout(self.timeout, self.bridge.forward(request)).await
  }
}

impl fmt::Debug for HostContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HostContext")
      .field("auth", &self.auth)
      .field("timeout", &self.timeout)
      .finish_non_exhaustive()
  }
}

/// The environment a dispatcher runs in
#[derive(Debug, Clone)]
pub enum ExecutionContext {
  Direct(DirectContext),
  Host(HostContext),
}

impl ExecutionContext {
  /// Start building a direct context for the Jira site at `base_url`
  pub fn direct(base_url: impl Into<String>) -> ContextBuilder {
    ContextBuilder::new(Target::Direct(base_url.into()))
  }

  /// Start building a context that forwards every request to `bridge`
  pub fn host(bridge: Arc<dyn HostBridge>) -> ContextBuilder {
    ContextBuilder::new(Target::Host(bridge))
  }

  pub fn auth(&self) -> &Auth {
    match self {
      ExecutionContext::Direct(ctx) => &ctx.auth,
      ExecutionContext::Host(ctx) => &ctx.auth,
    }
  }

  pub fn default_headers(&self) -> &HeaderMap {
    match self {
      ExecutionContext::Direct(ctx) => &ctx.default_headers,
      ExecutionContext::Host(ctx) => &ctx.default_headers,
    }
  }

  pub fn timeout(&self) -> Duration {
    match self {
      ExecutionContext::Direct(ctx) => ctx.timeout,
      ExecutionContext::Host(ctx) => ctx.timeout,
    }
  }

  /// Short label for logs
  pub fn label(&self) -> &'static str {
    match self {
      ExecutionContext::Direct(_) => "direct",
      ExecutionContext::Host(_) => "host",
    }
  }

  pub(crate) async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
    match self {
      ExecutionContext::Direct(ctx) => ctx.send(request).await,
      ExecutionContext::Host(ctx) => ctx.send(request).await,
    }
  }
}

enum Target {
  Direct(String),
  Host(Arc<dyn HostBridge>),
}

/// Builder for [`ExecutionContext`]
pub struct ContextBuilder {
  target: Target,
  auth: Auth,
  timeout: Duration,
  connect_timeout: Duration,
  user_agent: String,
  default_headers: Vec<(String, String)>,
}

impl ContextBuilder {
  fn new(target: Target) -> Self {
    Self {
      target,
      auth: Auth::None,
      timeout: DEFAULT_TIMEOUT,
      connect_timeout: DEFAULT_CONNECT_TIMEOUT,
      user_agent: USER_AGENT.to_string(),
      default_headers: Vec::new(),
    }
  }

  pub fn auth(mut self, auth: Auth) -> Self {
    self.auth = auth;
    self
  }

  /// Upper bound on a whole request, connect through last body byte
  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Direct context only; host bridges own their connections
  pub fn connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = user_agent.into();
    self
  }

  /// Header sent with every request unless the operation overrides it
  pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.default_headers.push((name.into(), value.into()));
    self
  }

  pub fn build(self) -> Result<ExecutionContext, ConfigError> {
    let mut default_headers = HeaderMap::new();
    for (name, value) in &self.default_headers {
      let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
        name: name.clone(),
        reason: e.to_string(),
      })?;
      let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
        name: name.clone(),
        reason: e.to_string(),
      })?;
      default_headers.insert(header_name, header_value);
    }

    if self.auth != Auth::None && self.auth.header_value().is_none() {
      return Err(ConfigError::InvalidHeader {
        name: "Authorization".to_string(),
        reason: format!("{} credentials contain characters not allowed in a header", self.auth.scheme()),
      });
    }

    match self.target {
      Target::Direct(base_url) => {
        let base_url = normalize_base_url(&base_url)?;
        let client = Client::builder()
          .timeout(self.timeout)
          .connect_timeout(self.connect_timeout)
          .user_agent(&self.user_agent)
          .build()?;

        debug!(base_url = %base_url, auth = self.auth.scheme(), "Built direct execution context");

        Ok(ExecutionContext::Direct(DirectContext {
          client,
          base_url,
          auth: self.auth,
          default_headers,
          timeout: self.timeout,
        }))
      }
      Target::Host(bridge) => {
        // The host has no client of its own to carry the user agent
        if !default_headers.contains_key(reqwest::header::USER_AGENT) {
          let value = HeaderValue::from_str(&self.user_agent).map_err(|e| ConfigError::InvalidHeader {
            name: "User-Agent".to_string(),
            reason: e.to_string(),
          })?;
          default_headers.insert(reqwest::header::USER_AGENT, value);
        }

        debug!(auth = self.auth.scheme(), "Built host execution context");

        Ok(ExecutionContext::Host(HostContext {
          bridge,
          auth: self.auth,
          default_headers,
          timeout: self.timeout,
        }))
      }
    }
  }
}

/// Validate a Jira site URL and strip trailing slashes
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
  let trimmed = raw.trim();
  let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
    url: raw.to_string(),
    reason: e.to_string(),
  })?;

  if !matches!(parsed.scheme(), "http" | "https") {
    return Err(ConfigError::InvalidBaseUrl {
      url: raw.to_string(),
      reason: format!("unsupported scheme '{}'", parsed.scheme()),
    });
  }
  if parsed.host_str().is_none() {
    return Err(ConfigError::InvalidBaseUrl {
      url: raw.to_string(),
      reason: "missing host".to_string(),
    });
  }
  if parsed.query().is_some() || parsed.fragment().is_some() {
    return Err(ConfigError::InvalidBaseUrl {
      url: raw.to_string(),
      reason: "query strings and fragments are not allowed".to_string(),
    });
  }

  Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  struct NeverCalled;

  #[async_trait]
  impl HostBridge for NeverCalled {
    async fn forward(&self, _request: PreparedRequest) -> Result<RawResponse, TransportError> {
      Err(TransportError::connect("not reachable in this test"))
    }
  }

  #[test]
  fn test_normalize_base_url() {
    assert_eq!(
      normalize_base_url("https://example.atlassian.net/").unwrap(),
      "https://example.atlassian.net"
    );
    assert_eq!(
      normalize_base_url("http://localhost:8080/jira//").unwrap(),
      "http://localhost:8080/jira"
    );
  }

  #[test]
  fn test_normalize_base_url_rejects_bad_input() {
    assert!(normalize_base_url("example.atlassian.net").is_err());
    assert!(normalize_base_url("ftp://example.com").is_err());
    assert!(normalize_base_url("https://example.com/?a=b").is_err());
  }

  #[test]
  fn test_direct_builder_defaults() {
    let ctx = ExecutionContext::direct("https://example.atlassian.net/").build().unwrap();
    assert_eq!(ctx.label(), "direct");
    assert_eq!(ctx.timeout(), DEFAULT_TIMEOUT);
    assert_eq!(ctx.auth(), &Auth::None);

    let ExecutionContext::Direct(direct) = ctx else {
      panic!("expected a direct context");
    };
    assert_eq!(direct.base_url(), "https://example.atlassian.net");
  }

  #[test]
  fn test_builder_rejects_invalid_default_header() {
    let err = ExecutionContext::direct("https://example.atlassian.net")
      .default_header("X-Bad", "line\nbreak")
      .build()
      .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader { ref name, .. } if name == "X-Bad"));
  }

  #[test]
  fn test_builder_rejects_unusable_credentials() {
    let err = ExecutionContext::direct("https://example.atlassian.net")
      .auth(Auth::bearer("line\nbreak"))
      .build()
      .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader { ref name, .. } if name == "Authorization"));
  }

  #[test]
  fn test_host_context_carries_user_agent_header() {
    let ctx = ExecutionContext::host(Arc::new(NeverCalled))
      .auth(Auth::jwt("token"))
      .timeout(Duration::from_secs(5))
      .build()
      .unwrap();

    assert_eq!(ctx.label(), "host");
    assert_eq!(ctx.timeout(), Duration::from_secs(5));
    assert_eq!(ctx.default_headers()[reqwest::header::USER_AGENT], USER_AGENT);
  }

  #[test]
  fn test_debug_does_not_leak_token() {
    let ctx = ExecutionContext::direct("https://example.atlassian.net")
      .auth(Auth::basic("me@example.com", "hunter2"))
      .build()
      .unwrap();
    assert!(!format!("{ctx:?}").contains("hunter2"));
  }
}
