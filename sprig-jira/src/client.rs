use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Auth;
use crate::catalog;
use crate::context::ExecutionContext;
use crate::descriptor::{Operation, ParamValue, QueryValue, RequestBody, parse_header};
use crate::dispatcher::Dispatcher;
use crate::error::{ApiError, ConfigError, DescriptorError};
use crate::response::DispatchResult;

/// Represents a Jira API client
#[derive(Debug, Clone)]
pub struct JiraClient {
  pub(crate) dispatcher: Dispatcher,
}

/// Arguments for a catalog call
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
  pub path_params: Vec<(String, ParamValue)>,
  pub query: Vec<(String, QueryValue)>,
  pub body: Option<RequestBody>,
  pub headers: HeaderMap,
}

impl CallArgs {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
    self.path_params.push((name.into(), value.into()));
    self
  }

  pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
    self.query.push((key.into(), value.into()));
    self
  }

  pub fn body(mut self, body: RequestBody) -> Self {
    self.body = Some(body);
    self
  }

  pub fn headers(mut self, headers: HeaderMap) -> Self {
    self.headers = headers;
    self
  }

  /// Add one per-call header, validating name and value
  pub fn header(mut self, name: &str, value: &str) -> Result<Self, DescriptorError> {
    let (header_name, header_value) = parse_header(name, value)?;
    self.headers.insert(header_name, header_value);
    Ok(self)
  }

  fn apply(self, mut operation: Operation) -> Operation {
    for (name, value) in self.path_params {
      operation = operation.path_param(name, value);
    }
    for (key, value) in self.query {
      operation = operation.query(key, value);
    }
    if let Some(body) = self.body {
      operation = operation.body(body);
    }
    operation.headers(self.headers)
  }
}

impl JiraClient {
  /// Create a new Jira client talking directly to `base_url`
  pub fn new(base_url: &str, auth: Auth) -> Result<Self, ConfigError> {
    let context = ExecutionContext::direct(base_url).auth(auth).build()?;
    Ok(Self::from_context(context))
  }

  /// Create a client over an already configured context
  pub fn from_context(context: ExecutionContext) -> Self {
    Self {
      dispatcher: Dispatcher::new(context),
    }
  }

  pub fn dispatcher(&self) -> &Dispatcher {
    &self.dispatcher
  }

  /// Dispatch the catalog endpoint `name` with `args`
  pub async fn call(&self, name: &str, args: CallArgs) -> DispatchResult {
    let operation = Self::endpoint(name)?;
    self.dispatcher.dispatch(args.apply(operation)).await
  }

  /// A fresh operation for the catalog endpoint `name`
  pub(crate) fn endpoint(name: &str) -> Result<Operation, ApiError> {
    let spec = catalog::find(name).ok_or_else(|| DescriptorError::UnknownEndpoint(name.to_string()))?;
    Ok(spec.operation())
  }

  pub(crate) fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<RequestBody, ApiError> {
    RequestBody::json(value).map_err(|e| DescriptorError::InvalidBody(e.to_string()).into())
  }

  /// Dispatch and decode a JSON response into `T`
  pub(crate) async fn fetch_json<T: DeserializeOwned>(&self, operation: Operation) -> Result<T, ApiError> {
    self.dispatcher.dispatch(operation).await?.json()
  }

  /// Test the Jira connection by fetching the current user.
  ///
  /// Authentication failures yield `Ok(false)`; every other failure is
  /// returned as an error.
  pub async fn test_connection(&self) -> Result<bool, ApiError> {
    match self.dispatcher.dispatch(Self::endpoint("get_myself")?).await {
      Ok(_) => Ok(true),
      Err(err) if matches!(err.status(), Some(401 | 403)) => {
        debug!("Jira rejected the configured credentials: {err}");
        Ok(false)
      }
      Err(err) => Err(err),
    }
  }
}

/// Create a Jira client from basic credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> Result<JiraClient, ConfigError> {
  JiraClient::new(base_url, Auth::basic(username, api_token))
}
