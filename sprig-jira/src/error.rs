//! # Dispatch Errors
//!
//! Structured failures returned by the dispatcher. Every expected failure mode
//! (transport, protocol, decoding) comes back as an [`ApiError`] value so
//! callers can match on it instead of inspecting transport-specific errors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::descriptor::Operation;

/// Broad classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The request never completed
  Transport,
  /// The server answered with a non-success status
  Protocol,
  /// A success response could not be decoded
  Decoding,
  /// The operation descriptor itself is invalid (a bug in the caller)
  InvalidDescriptor,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ErrorKind::Transport => "transport",
      ErrorKind::Protocol => "protocol",
      ErrorKind::Decoding => "decoding",
      ErrorKind::InvalidDescriptor => "invalid-descriptor",
    };
    f.write_str(name)
  }
}

/// Why a request never completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
  /// Connection refused, reset, or TLS failure
  Connect,
  /// The configured timeout elapsed
  Timeout,
  /// Host name resolution failed
  Dns,
  /// The caller cancelled the call
  Cancelled,
  /// The request or response body could not be streamed
  Body,
  /// Anything else the transport reported
  Other,
}

impl fmt::Display for TransportErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TransportErrorKind::Connect => "connect",
      TransportErrorKind::Timeout => "timeout",
      TransportErrorKind::Dns => "dns",
      TransportErrorKind::Cancelled => "cancelled",
      TransportErrorKind::Body => "body",
      TransportErrorKind::Other => "other",
    };
    f.write_str(name)
  }
}

/// Failure reported by a transport before any response was received.
///
/// Host bridges return this type; the dispatcher attaches the originating
/// operation and lifts it into [`ApiError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
  pub kind: TransportErrorKind,
  pub message: String,
}

impl TransportError {
  /// Create a transport error of the given kind
  pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }

  /// Shorthand for a timeout failure
  pub fn timeout(message: impl Into<String>) -> Self {
    Self::new(TransportErrorKind::Timeout, message)
  }

  /// Shorthand for a connection failure
  pub fn connect(message: impl Into<String>) -> Self {
    Self::new(TransportErrorKind::Connect, message)
  }
}

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    let kind = if err.is_timeout() {
      TransportErrorKind::Timeout
    } else if err.is_connect() {
      if is_dns_failure(&err) {
        TransportErrorKind::Dns
      } else {
        TransportErrorKind::Connect
      }
    } else if err.is_body() || err.is_decode() {
      TransportErrorKind::Body
    } else {
      TransportErrorKind::Other
    };

    Self::new(kind, error_chain(&err))
  }
}

/// Walk the source chain looking for a resolver failure.
///
/// reqwest reports DNS failures as connect errors; the resolver message is
/// the only place the distinction survives.
fn is_dns_failure(err: &(dyn std::error::Error + 'static)) -> bool {
  let mut current = Some(err);
  while let Some(e) = current {
    let text = e.to_string().to_ascii_lowercase();
    if text.contains("dns error") || text.contains("failed to lookup address") {
      return true;
    }
    current = e.source();
  }
  false
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
  let mut message = err.to_string();
  let mut current = err.source();
  while let Some(e) = current {
    message.push_str(": ");
    message.push_str(&e.to_string());
    current = e.source();
  }
  message
}

/// Defects in an operation descriptor, detected before any I/O happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
  #[error("path template '{template}' has no value for placeholder '{name}'")]
  MissingPathParam { template: String, name: String },
  #[error("path template '{template}' has no placeholder named '{name}'")]
  UnexpectedPathParam { template: String, name: String },
  #[error("path template '{template}' cannot take '{value}' for placeholder '{name}'")]
  InvalidPathSegment { template: String, name: String, value: String },
  #[error("path template '{template}' is malformed: {reason}")]
  MalformedTemplate { template: String, reason: String },
  #[error("invalid header '{name}': {reason}")]
  InvalidHeader { name: String, reason: String },
  #[error("unknown endpoint '{0}'")]
  UnknownEndpoint(String),
  #[error("request body could not be serialized: {0}")]
  InvalidBody(String),
}

/// Error returned when an execution context cannot be constructed
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid base URL '{url}': {reason}")]
  InvalidBaseUrl { url: String, reason: String },
  #[error("invalid default header '{name}': {reason}")]
  InvalidHeader { name: String, reason: String },
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

/// Normalized failure of a single dispatched operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
  #[error("{method} {path}: {kind} error: {message}", method = .operation.method, path = .operation.path)]
  Transport {
    kind: TransportErrorKind,
    message: String,
    operation: Arc<Operation>,
  },

  #[error("{method} {path}: HTTP {status}{}", format_messages(.payload.as_ref(), .body), method = .operation.method, path = .operation.path)]
  Protocol {
    status: u16,
    /// The error body parsed as JSON, when the server sent JSON
    payload: Option<Value>,
    /// The raw error body
    body: String,
    operation: Arc<Operation>,
  },

  #[error("{method} {path}: failed to decode HTTP {status} response: {message}", method = .operation.method, path = .operation.path)]
  Decoding {
    status: u16,
    message: String,
    operation: Arc<Operation>,
  },

  #[error("invalid operation: {0}")]
  InvalidDescriptor(#[from] DescriptorError),
}

impl ApiError {
  pub(crate) fn transport(err: TransportError, operation: Arc<Operation>) -> Self {
    ApiError::Transport {
      kind: err.kind,
      message: err.message,
      operation,
    }
  }

  /// The broad classification of this error
  pub fn kind(&self) -> ErrorKind {
    match self {
      ApiError::Transport { .. } => ErrorKind::Transport,
      ApiError::Protocol { .. } => ErrorKind::Protocol,
      ApiError::Decoding { .. } => ErrorKind::Decoding,
      ApiError::InvalidDescriptor(_) => ErrorKind::InvalidDescriptor,
    }
  }

  /// The HTTP status, when a response was received
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Protocol { status, .. } | ApiError::Decoding { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// The transport failure kind, for transport errors
  pub fn transport_kind(&self) -> Option<TransportErrorKind> {
    match self {
      ApiError::Transport { kind, .. } => Some(*kind),
      _ => None,
    }
  }

  pub fn is_timeout(&self) -> bool {
    self.transport_kind() == Some(TransportErrorKind::Timeout)
  }

  pub fn is_cancelled(&self) -> bool {
    self.transport_kind() == Some(TransportErrorKind::Cancelled)
  }

  /// The operation that produced this error, if it got far enough to have one
  pub fn operation(&self) -> Option<&Operation> {
    match self {
      ApiError::Transport { operation, .. }
      | ApiError::Protocol { operation, .. }
      | ApiError::Decoding { operation, .. } => Some(operation),
      ApiError::InvalidDescriptor(_) => None,
    }
  }

  /// Human-readable messages from a Jira error body.
  ///
  /// Jira reports failures as `{"errorMessages": [...], "errors": {...}}`;
  /// both collections are flattened here, field errors as `field: message`.
  pub fn error_messages(&self) -> Vec<String> {
    match self {
      ApiError::Protocol { payload: Some(payload), .. } => jira_error_messages(payload),
      _ => Vec::new(),
    }
  }
}

pub(crate) fn jira_error_messages(payload: &Value) -> Vec<String> {
  let mut messages = Vec::new();

  if let Some(list) = payload.get("errorMessages").and_then(Value::as_array) {
    messages.extend(list.iter().filter_map(Value::as_str).map(str::to_string));
  }

  if let Some(errors) = payload.get("errors").and_then(Value::as_object) {
    for (field, message) in errors {
      match message.as_str() {
        Some(text) => messages.push(format!("{field}: {text}")),
        None => messages.push(format!("{field}: {message}")),
      }
    }
  }

  // Some endpoints (and gateways in front of Jira) use a single "message"
  if messages.is_empty()
    && let Some(message) = payload.get("message").and_then(Value::as_str)
  {
    messages.push(message.to_string());
  }

  messages
}

fn format_messages(payload: Option<&Value>, body: &str) -> String {
  let messages = payload.map(jira_error_messages).unwrap_or_default();
  if !messages.is_empty() {
    return format!(" - {}", messages.join("; "));
  }

  let trimmed = body.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    let snippet: String = trimmed.chars().take(200).collect();
    format!(" - {snippet}")
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn operation() -> Arc<Operation> {
    Arc::new(Operation::get("/rest/api/3/issue/{issueIdOrKey}").path_param("issueIdOrKey", "TEST-1"))
  }

  #[test]
  fn test_error_messages_flattens_jira_body() {
    let err = ApiError::Protocol {
      status: 400,
      payload: Some(json!({
        "errorMessages": ["Issue does not exist"],
        "errors": { "summary": "Summary is required" }
      })),
      body: String::new(),
      operation: operation(),
    };

    assert_eq!(
      err.error_messages(),
      vec!["Issue does not exist".to_string(), "summary: Summary is required".to_string()]
    );
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(400));
  }

  #[test]
  fn test_error_messages_falls_back_to_message_field() {
    let messages = jira_error_messages(&json!({ "message": "Rate limit exceeded" }));
    assert_eq!(messages, vec!["Rate limit exceeded".to_string()]);
  }

  #[test]
  fn test_protocol_display_includes_messages() {
    let err = ApiError::Protocol {
      status: 404,
      payload: Some(json!({ "errorMessages": ["Issue does not exist"], "errors": {} })),
      body: String::new(),
      operation: operation(),
    };

    let text = err.to_string();
    assert!(text.contains("GET /rest/api/3/issue/{issueIdOrKey}"));
    assert!(text.contains("HTTP 404"));
    assert!(text.contains("Issue does not exist"));
  }

  #[test]
  fn test_transport_helpers() {
    let err = ApiError::transport(TransportError::timeout("deadline elapsed"), operation());
    assert!(err.is_timeout());
    assert!(!err.is_cancelled());
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
    assert!(err.operation().is_some());
  }

  #[test]
  fn test_descriptor_error_has_no_operation() {
    let err = ApiError::from(DescriptorError::UnknownEndpoint("nope".to_string()));
    assert_eq!(err.kind(), ErrorKind::InvalidDescriptor);
    assert!(err.operation().is_none());
    assert_eq!(err.to_string(), "invalid operation: unknown endpoint 'nope'");
  }
}
