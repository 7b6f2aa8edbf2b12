//! # Jira Attachment Endpoints
//!
//! Uploads stream the file from disk as multipart/form-data; downloads hand
//! back the raw bytes whatever their content type.

use std::path::Path;

use bytes::Bytes;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::instrument;

use crate::client::JiraClient;
use crate::descriptor::{MultipartForm, MultipartPart, RequestBody};
use crate::error::ApiError;
use crate::models::JiraAttachment;
use crate::response::ResponseBody;

impl JiraClient {
  /// Attach a file to an issue
  #[instrument(skip(self), level = "debug")]
  pub async fn add_attachment(&self, issue_key: &str, file: &Path) -> Result<Vec<JiraAttachment>, ApiError> {
    let form = MultipartForm::new().part(MultipartPart::file("file", file));
    let operation = Self::endpoint("add_attachment")?
      .path_param("issueIdOrKey", issue_key)
      .body(RequestBody::Multipart(form));
    self.fetch_json(operation).await
  }

  /// Download the content of an attachment
  #[instrument(skip(self), level = "debug")]
  pub async fn attachment_content(&self, attachment_id: &str) -> Result<Bytes, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

    let operation = Self::endpoint("get_attachment_content")?
      .path_param("id", attachment_id)
      .headers(headers);

    let response = self.dispatcher.dispatch(operation).await?;
    Ok(match response.body {
      ResponseBody::Binary { data, .. } => data,
      ResponseBody::Text(text) => Bytes::from(text),
      ResponseBody::Json(value) => Bytes::from(value.to_string()),
      ResponseBody::Empty => Bytes::new(),
    })
  }
}
