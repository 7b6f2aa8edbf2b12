//! # Operation Descriptors
//!
//! An [`Operation`] is a plain value describing one API call: method, path
//! template, path and query parameters, optional body, per-call headers, and
//! whether a response body is expected. Descriptors carry no connection state,
//! so the same value can be dispatched through either execution context.

use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::encoding;
use crate::error::DescriptorError;

/// HTTP methods used by the Jira REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete,
}

impl Method {
  pub fn as_str(&self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Delete => "DELETE",
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<Method> for reqwest::Method {
  fn from(method: Method) -> Self {
    match method {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

impl std::str::FromStr for Method {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "GET" => Ok(Method::Get),
      "POST" => Ok(Method::Post),
      "PUT" => Ok(Method::Put),
      "DELETE" => Ok(Method::Delete),
      other => Err(format!("unsupported HTTP method '{other}'")),
    }
  }
}

/// A scalar that can be rendered into a path segment or query value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
  Str(String),
  Int(i64),
  UInt(u64),
  Float(f64),
  Bool(bool),
}

impl fmt::Display for ParamValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParamValue::Str(s) => f.write_str(s),
      ParamValue::Int(n) => write!(f, "{n}"),
      ParamValue::UInt(n) => write!(f, "{n}"),
      ParamValue::Float(n) => write!(f, "{n}"),
      ParamValue::Bool(b) => write!(f, "{b}"),
    }
  }
}

impl From<&str> for ParamValue {
  fn from(value: &str) -> Self {
    ParamValue::Str(value.to_string())
  }
}

impl From<String> for ParamValue {
  fn from(value: String) -> Self {
    ParamValue::Str(value)
  }
}

impl From<&String> for ParamValue {
  fn from(value: &String) -> Self {
    ParamValue::Str(value.clone())
  }
}

impl From<bool> for ParamValue {
  fn from(value: bool) -> Self {
    ParamValue::Bool(value)
  }
}

impl From<f64> for ParamValue {
  fn from(value: f64) -> Self {
    ParamValue::Float(value)
  }
}

macro_rules! impl_param_from_int {
  ($variant:ident, $target:ty: $($ty:ty),*) => {
    $(
      impl From<$ty> for ParamValue {
        fn from(value: $ty) -> Self {
          ParamValue::$variant(<$target>::from(value))
        }
      }
    )*
  };
}

impl_param_from_int!(Int, i64: i8, i16, i32, i64);
impl_param_from_int!(UInt, u64: u8, u16, u32, u64);

impl From<usize> for ParamValue {
  fn from(value: usize) -> Self {
    ParamValue::UInt(value as u64)
  }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), DescriptorError> {
  let invalid = |reason: String| DescriptorError::InvalidHeader {
    name: name.to_string(),
    reason,
  };
  let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
  let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
  Ok((header_name, header_value))
}

/// Replace every name present in `source`, keeping all of its values
pub(crate) fn overlay_headers(target: &mut HeaderMap, source: &HeaderMap) {
  for name in source.keys() {
    target.remove(name);
    for value in source.get_all(name) {
      target.append(name.clone(), value.clone());
    }
  }
}

/// A query parameter value: absent, a single scalar, or a list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryValue {
  /// Dropped from the query string entirely
  #[default]
  Absent,
  Scalar(ParamValue),
  /// Serialized as one repeated key per element
  List(Vec<ParamValue>),
}

macro_rules! impl_query_from {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for QueryValue {
        fn from(value: $ty) -> Self {
          QueryValue::Scalar(value.into())
        }
      }

      impl From<Option<$ty>> for QueryValue {
        fn from(value: Option<$ty>) -> Self {
          match value {
            Some(v) => QueryValue::Scalar(v.into()),
            None => QueryValue::Absent,
          }
        }
      }

      impl From<Vec<$ty>> for QueryValue {
        fn from(values: Vec<$ty>) -> Self {
          QueryValue::List(values.into_iter().map(Into::into).collect())
        }
      }
    )*
  };
}

impl_query_from!(
  &str, String, &String, bool, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize
);

impl From<ParamValue> for QueryValue {
  fn from(value: ParamValue) -> Self {
    QueryValue::Scalar(value)
  }
}

/// Where the bytes of a multipart part come from
#[derive(Debug, Clone, PartialEq)]
pub enum PartData {
  /// Already in memory
  Bytes(Bytes),
  /// Streamed from disk when the request is sent
  File(PathBuf),
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
  pub name: String,
  pub file_name: Option<String>,
  pub content_type: Option<String>,
  pub data: PartData,
}

impl MultipartPart {
  /// A part whose content is read from `path` at send time.
  ///
  /// The file name defaults to the last path component.
  pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    Self {
      name: name.into(),
      file_name,
      content_type: None,
      data: PartData::File(path),
    }
  }

  /// An in-memory part
  pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
    Self {
      name: name.into(),
      file_name: None,
      content_type: None,
      data: PartData::Bytes(data.into()),
    }
  }

  /// A plain text field
  pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::bytes(name, Bytes::from(value.into()))
  }

  pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
    self.file_name = Some(file_name.into());
    self
  }

  pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
    self.content_type = Some(content_type.into());
    self
  }
}

/// An ordered multipart/form-data payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartForm {
  pub parts: Vec<MultipartPart>,
}

impl MultipartForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn part(mut self, part: MultipartPart) -> Self {
    self.parts.push(part);
    self
  }
}

/// Request payload handed through to the transport untouched
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
  /// Pre-serialized JSON text
  Json(String),
  Text(String),
  Bytes { content_type: String, data: Bytes },
  Multipart(MultipartForm),
}

impl RequestBody {
  /// Serialize a value into a JSON body
  pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
    serde_json::to_string(value).map(RequestBody::Json)
  }

  /// The `Content-Type` implied by this body, if it has a fixed one.
  ///
  /// Multipart bodies return `None`: the boundary is chosen by the encoder.
  pub fn default_content_type(&self) -> Option<&str> {
    match self {
      RequestBody::Json(_) => Some("application/json"),
      RequestBody::Text(_) => Some("text/plain; charset=utf-8"),
      RequestBody::Bytes { content_type, .. } => Some(content_type),
      RequestBody::Multipart(_) => None,
    }
  }

  pub fn is_multipart(&self) -> bool {
    matches!(self, RequestBody::Multipart(_))
  }
}

/// A complete description of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
  pub method: Method,
  /// URL path template with `{name}` placeholders
  pub path: String,
  pub path_params: Vec<(String, ParamValue)>,
  pub query_params: Vec<(String, QueryValue)>,
  pub body: Option<RequestBody>,
  /// Per-call headers; these win over every default the dispatcher sets
  pub headers: HeaderMap,
  pub expects_response_body: bool,
}

impl Operation {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      path_params: Vec::new(),
      query_params: Vec::new(),
      body: None,
      headers: HeaderMap::new(),
      expects_response_body: true,
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(Method::Get, path)
  }

  pub fn post(path: impl Into<String>) -> Self {
    Self::new(Method::Post, path)
  }

  pub fn put(path: impl Into<String>) -> Self {
    Self::new(Method::Put, path)
  }

  pub fn delete(path: impl Into<String>) -> Self {
    Self::new(Method::Delete, path)
  }

  /// Set a path parameter, replacing any earlier value with the same name
  pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
    let name = name.into();
    let value = value.into();
    match self.path_params.iter_mut().find(|(n, _)| *n == name) {
      Some(slot) => slot.1 = value,
      None => self.path_params.push((name, value)),
    }
    self
  }

  /// Append a query parameter; `None` values are kept as [`QueryValue::Absent`]
  /// and dropped during encoding
  pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
    self.query_params.push((key.into(), value.into()));
    self
  }

  pub fn body(mut self, body: RequestBody) -> Self {
    self.body = Some(body);
    self
  }

  /// Serialize `value` as the JSON body
  pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
    Ok(self.body(RequestBody::json(value)?))
  }

  /// Add a per-call header.
  ///
  /// Invalid names or values are reported as [`DescriptorError::InvalidHeader`].
  pub fn header(mut self, name: &str, value: &str) -> Result<Self, DescriptorError> {
    let (header_name, header_value) = parse_header(name, value)?;
    self.headers.insert(header_name, header_value);
    Ok(self)
  }

  /// Merge a prepared header map into the per-call headers
  pub fn headers(mut self, headers: HeaderMap) -> Self {
    overlay_headers(&mut self.headers, &headers);
    self
  }

  pub fn expects_response_body(mut self, expects: bool) -> Self {
    self.expects_response_body = expects;
    self
  }

  /// Substitute path parameters into the template
  pub fn resolved_path(&self) -> Result<String, DescriptorError> {
    encoding::resolve_path(&self.path, &self.path_params)
  }

  /// Encoded query pairs, in insertion order, with absent values dropped
  pub fn query_pairs(&self) -> Vec<(String, String)> {
    encoding::encode_query(&self.query_params)
  }

  /// Check the descriptor for programming errors without sending anything
  pub fn validate(&self) -> Result<(), DescriptorError> {
    self.resolved_path().map(|_| ())
  }
}
