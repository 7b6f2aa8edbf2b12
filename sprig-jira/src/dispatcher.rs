//! # Request Dispatcher
//!
//! The single chokepoint every Jira call goes through. For one
//! [`Operation`] it resolves the path template, encodes the query, merges
//! headers (auth included), sends through the active [`ExecutionContext`],
//! and classifies the response with the shared [`classify`] routine.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, instrument, trace, warn};

use crate::consts::ATLASSIAN_TOKEN_HEADER;
use crate::context::ExecutionContext;
use crate::descriptor::{Operation, overlay_headers};
use crate::error::{ApiError, DescriptorError, TransportError, TransportErrorKind};
use crate::response::{DispatchResult, classify};
use crate::transport::PreparedRequest;

/// Resolves operations against one execution context.
///
/// Cloning is cheap and clones share the context (and, for direct contexts,
/// the connection pool). Calls never share mutable state, so a dispatcher can
/// be used from many tasks at once.
#[derive(Debug, Clone)]
pub struct Dispatcher {
  context: Arc<ExecutionContext>,
}

impl Dispatcher {
  pub fn new(context: ExecutionContext) -> Self {
    Self {
      context: Arc::new(context),
    }
  }

  pub fn context(&self) -> &ExecutionContext {
    &self.context
  }

  /// Resolve an operation into the wire tuple both contexts send.
  ///
  /// No I/O happens here; descriptor defects come back as
  /// [`ApiError::InvalidDescriptor`].
  pub fn prepare(&self, operation: &Operation) -> Result<PreparedRequest, ApiError> {
    let path = operation.resolved_path()?;
    let query = operation.query_pairs();
    let headers = self.merge_headers(operation)?;

    Ok(PreparedRequest {
      method: operation.method,
      path,
      query,
      headers,
      body: operation.body.clone(),
    })
  }

  fn merge_headers(&self, operation: &Operation) -> Result<HeaderMap, DescriptorError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(body) = &operation.body {
      if let Some(content_type) = body.default_content_type() {
        let value = HeaderValue::from_str(content_type).map_err(|e| DescriptorError::InvalidHeader {
          name: CONTENT_TYPE.to_string(),
          reason: e.to_string(),
        })?;
        headers.insert(CONTENT_TYPE, value);
      }
      if body.is_multipart() {
        headers.insert(
          HeaderName::from_static(ATLASSIAN_TOKEN_HEADER),
          HeaderValue::from_static("no-check"),
        );
      }
    }

    overlay_headers(&mut headers, self.context.default_headers());

    if let Some(value) = self.context.auth().header_value() {
      headers.insert(AUTHORIZATION, value);
    }

    overlay_headers(&mut headers, &operation.headers);

    Ok(headers)
  }

  /// Dispatch one operation and classify its response
  pub async fn dispatch(&self, operation: Operation) -> DispatchResult {
    self.dispatch_shared(Arc::new(operation)).await
  }

  /// Dispatch one operation, giving up when `cancel` resolves first.
  ///
  /// Cancellation drops the in-flight transport future and yields a
  /// [`TransportErrorKind::Cancelled`] error.
  pub async fn dispatch_until<C>(&self, operation: Operation, cancel: C) -> DispatchResult
  where
    C: Future<Output = ()>,
  {
    let operation = Arc::new(operation);

    tokio::select! {
      result = self.dispatch_shared(Arc::clone(&operation)) => result,
      () = cancel => {
        debug!(method = %operation.method, path = %operation.path, "Request cancelled by caller");
        Err(ApiError::transport(
          TransportError::new(TransportErrorKind::Cancelled, "request cancelled by caller"),
          operation,
        ))
      }
    }
  }

  #[instrument(
    skip_all,
    level = "debug",
    fields(method = %operation.method, path = %operation.path, context = self.context.label())
  )]
  async fn dispatch_shared(&self, operation: Arc<Operation>) -> DispatchResult {
    let request = match self.prepare(&operation) {
      Ok(request) => request,
      Err(err) => {
        error!("Refusing to send invalid operation: {err}");
        return Err(err);
      }
    };

    let target = request.path_and_query();
    debug!(target = %target, "Dispatching request");
    trace!(
      headers = ?request.headers.keys().map(HeaderName::as_str).collect::<Vec<_>>(),
      query = ?request.query,
      "Request detail"
    );

    let started = Instant::now();
    let raw = self.context.send(request).await.map_err(|err| {
      warn!(kind = %err.kind, elapsed_ms = started.elapsed().as_millis() as u64, "Transport failure: {}", err.message);
      ApiError::transport(err, Arc::clone(&operation))
    })?;

    debug!(
      status = raw.status,
      bytes = raw.body.len(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "Received response"
    );

    let result = classify(raw, &operation);
    if let Err(err) = &result {
      warn!(kind = %err.kind(), status = ?err.status(), "Request failed: {err}");
    }
    result
  }
}
