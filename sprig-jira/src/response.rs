//! # Response Classification
//!
//! The one routine that decides success versus failure and how a body is
//! decoded. Both execution contexts feed their [`RawResponse`] through
//! [`classify`], so the rules below hold no matter how the request left the
//! process.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::descriptor::Operation;
use crate::error::ApiError;
use crate::transport::RawResponse;

/// Outcome of one dispatched operation
pub type DispatchResult = Result<ApiResponse, ApiError>;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
  /// No body was expected, or none was sent
  Empty,
  Json(Value),
  Text(String),
  /// Images, archives and other non-text payloads, passed through untouched
  Binary { content_type: String, data: Bytes },
}

/// A successful response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status: u16,
  pub headers: HeaderMap,
  pub body: ResponseBody,
  /// The operation this response answers
  pub operation: Arc<Operation>,
}

impl ApiResponse {
  pub fn is_empty(&self) -> bool {
    matches!(self.body, ResponseBody::Empty)
  }

  /// The JSON body, if the response carried one
  pub fn json_value(&self) -> Option<&Value> {
    match &self.body {
      ResponseBody::Json(value) => Some(value),
      _ => None,
    }
  }

  /// Deserialize the JSON body into `T`.
  ///
  /// A non-JSON body, or JSON of the wrong shape, is reported as
  /// [`ApiError::Decoding`].
  pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
    let value = match &self.body {
      ResponseBody::Json(value) => value.clone(),
      ResponseBody::Empty => Value::Null,
      other => {
        return Err(ApiError::Decoding {
          status: self.status,
          message: format!("expected a JSON body, got {}", body_kind(other)),
          operation: Arc::clone(&self.operation),
        });
      }
    };

    serde_json::from_value(value).map_err(|e| ApiError::Decoding {
      status: self.status,
      message: e.to_string(),
      operation: Arc::clone(&self.operation),
    })
  }

  /// The body as text, for text responses
  pub fn text(&self) -> Option<&str> {
    match &self.body {
      ResponseBody::Text(text) => Some(text),
      _ => None,
    }
  }

  /// The raw bytes of a binary response
  pub fn bytes(&self) -> Option<&Bytes> {
    match &self.body {
      ResponseBody::Binary { data, .. } => Some(data),
      _ => None,
    }
  }
}

fn body_kind(body: &ResponseBody) -> &'static str {
  match body {
    ResponseBody::Empty => "an empty body",
    ResponseBody::Json(_) => "JSON",
    ResponseBody::Text(_) => "text",
    ResponseBody::Binary { .. } => "binary content",
  }
}

/// 2xx is success; 207 is included because bulk endpoints report partial
/// success with it
pub fn is_success(status: u16) -> bool {
  (200..300).contains(&status)
}

fn media_type(content_type: &str) -> String {
  content_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase()
}

fn is_json(media_type: &str) -> bool {
  media_type == "application/json" || media_type.ends_with("+json")
}

/// Turn a raw response into a [`DispatchResult`].
pub fn classify(raw: RawResponse, operation: &Arc<Operation>) -> DispatchResult {
  let RawResponse { status, headers, body } = raw;
  let content_type = headers
    .get(reqwest::header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);

  if !is_success(status) {
    let text = String::from_utf8_lossy(&body).into_owned();
    let payload = serde_json::from_slice::<Value>(&body).ok();
    return Err(ApiError::Protocol {
      status,
      payload,
      body: text,
      operation: Arc::clone(operation),
    });
  }

  if !operation.expects_response_body || body.is_empty() {
    return Ok(ApiResponse {
      status,
      headers,
      body: ResponseBody::Empty,
      operation: Arc::clone(operation),
    });
  }

  let decoded = match content_type.as_deref().map(media_type) {
    Some(mt) if is_json(&mt) => {
      let value = serde_json::from_slice::<Value>(&body).map_err(|e| ApiError::Decoding {
        status,
        message: format!("invalid JSON: {e}"),
        operation: Arc::clone(operation),
      })?;
      ResponseBody::Json(value)
    }
    Some(mt) if mt.starts_with("text/") => {
      let text = String::from_utf8(body.to_vec()).map_err(|e| ApiError::Decoding {
        status,
        message: format!("invalid UTF-8 in {mt} body: {e}"),
        operation: Arc::clone(operation),
      })?;
      ResponseBody::Text(text)
    }
    Some(_) => ResponseBody::Binary {
      content_type: content_type.unwrap_or_default(),
      data: body,
    },
    None => ResponseBody::Binary {
      content_type: "application/octet-stream".to_string(),
      data: body,
    },
  };

  Ok(ApiResponse {
    status,
    headers,
    body: decoded,
    operation: Arc::clone(operation),
  })
}
