//! # Wire Types and the Direct Transport
//!
//! [`PreparedRequest`] is the context-agnostic tuple produced from an
//! operation (method, resolved path, query pairs, merged headers, body) and
//! [`RawResponse`] is what either context hands back. The direct transport
//! below turns one into the other with `reqwest`.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use tracing::trace;

use crate::descriptor::{Method, MultipartForm, PartData, RequestBody};
use crate::encoding;
use crate::error::{TransportError, TransportErrorKind};

/// A fully resolved request, ready to leave the process
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
  pub method: Method,
  /// Path with placeholders substituted, starting with `/`
  pub path: String,
  /// Query pairs in order; repeated keys are preserved
  pub query: Vec<(String, String)>,
  pub headers: HeaderMap,
  pub body: Option<RequestBody>,
}

impl PreparedRequest {
  /// The encoded query string, without the leading `?`
  pub fn query_string(&self) -> String {
    encoding::query_string(&self.query)
  }

  /// Path plus query string, as it appears on the request line
  pub fn path_and_query(&self) -> String {
    if self.query.is_empty() {
      self.path.clone()
    } else {
      format!("{}?{}", self.path, self.query_string())
    }
  }
}

/// A response as received from the network or a host bridge
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResponse {
  pub status: u16,
  pub headers: HeaderMap,
  pub body: Bytes,
}

impl RawResponse {
  pub fn new(status: u16) -> Self {
    Self {
      status,
      ..Default::default()
    }
  }

  pub fn with_header(mut self, name: reqwest::header::HeaderName, value: &str) -> Self {
    if let Ok(value) = reqwest::header::HeaderValue::from_str(value) {
      self.headers.insert(name, value);
    }
    self
  }

  pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
    self.body = body.into();
    self
  }

  /// A JSON response with the matching content type
  pub fn json(status: u16, body: &serde_json::Value) -> Self {
    Self::new(status)
      .with_header(CONTENT_TYPE, "application/json")
      .with_body(body.to_string())
  }

  /// The `Content-Type` header, if present and readable
  pub fn content_type(&self) -> Option<&str> {
    self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
  }
}

/// Send a prepared request with `reqwest` and buffer the response body
pub(crate) async fn send_direct(
  client: &Client,
  base_url: &str,
  request: PreparedRequest,
) -> Result<RawResponse, TransportError> {
  let url = format!("{base_url}{}", request.path);
  let mut headers = request.headers;

  let mut builder = client.request(request.method.into(), &url);
  if !request.query.is_empty() {
    builder = builder.query(&request.query);
  }

  builder = match request.body {
    None => builder,
    Some(RequestBody::Json(text)) | Some(RequestBody::Text(text)) => builder.body(text),
    Some(RequestBody::Bytes { data, .. }) => builder.body(data),
    Some(RequestBody::Multipart(form)) => {
      // The encoder picks the boundary, so a fixed Content-Type would break it
      headers.remove(CONTENT_TYPE);
      builder.multipart(build_form(form).await?)
    }
  };

  trace!(url = %url, headers = headers.len(), "Sending direct request");

  let response = builder.headers(headers).send().await?;
  let status = response.status().as_u16();
  let headers = response.headers().clone();
  let body = response.bytes().await?;

  Ok(RawResponse { status, headers, body })
}

async fn build_form(form: MultipartForm) -> Result<Form, TransportError> {
  let mut multipart = Form::new();

  for part in form.parts {
    let mut encoded = match part.data {
      PartData::Bytes(data) => Part::stream(data),
      PartData::File(path) => {
        let file = tokio::fs::File::open(&path).await.map_err(|e| {
          TransportError::new(
            TransportErrorKind::Body,
            format!("Failed to open {}: {e}", path.display()),
          )
        })?;
        let length = file
          .metadata()
          .await
          .map_err(|e| TransportError::new(TransportErrorKind::Body, format!("Failed to stat {}: {e}", path.display())))?
          .len();
        Part::stream_with_length(reqwest::Body::from(file), length)
      }
    };

    if let Some(file_name) = part.file_name {
      encoded = encoded.file_name(file_name);
    }
    if let Some(content_type) = part.content_type {
      encoded = encoded
        .mime_str(&content_type)
        .map_err(|e| TransportError::new(TransportErrorKind::Body, format!("Invalid part content type: {e}")))?;
    }

    multipart = multipart.part(part.name, encoded);
  }

  Ok(multipart)
}

/// Apply a timeout to a host-forwarded call
pub(crate) async fn with_timeout<F>(timeout: Duration, future: F) -> Result<RawResponse, TransportError>
where
  F: Future<Output = Result<RawResponse, TransportError>>,
{
  match tokio::time::timeout(timeout, future).await {
    Ok(result) => result,
    Err(_) => Err(TransportError::timeout(format!(
      "no response within {} ms",
      timeout.as_millis()
    ))),
  }
}
