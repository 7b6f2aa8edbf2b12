//! Serde models for the typed helpers on [`JiraClient`](crate::JiraClient).
//!
//! Only the fields the helpers read are modelled; everything else in a Jira
//! payload is ignored on deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Represents a Jira issue
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueFields {
  pub summary: String,
  /// Atlassian Document Format in API v3
  #[serde(default)]
  pub description: Option<Value>,
  pub status: JiraIssueStatus,
  #[serde(default)]
  pub assignee: Option<JiraUser>,
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueStatus {
  pub id: Option<String>,
  pub name: String,
}

/// Represents a Jira transition
#[derive(Debug, Clone, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub to: Option<JiraIssueStatus>,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

impl TransitionRequest {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      transition: TransitionId { id: id.into() },
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  pub account_id: String,
  pub display_name: String,
  #[serde(default)]
  pub email_address: Option<String>,
  #[serde(default)]
  pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraComment {
  pub id: String,
  #[serde(default)]
  pub author: Option<JiraUser>,
  /// Atlassian Document Format
  pub body: Value,
  #[serde(default)]
  pub created: Option<String>,
}

/// Payload for adding a comment
#[derive(Debug, Serialize)]
pub struct CommentRequest {
  pub body: Value,
}

impl CommentRequest {
  /// A comment consisting of one plain-text paragraph
  pub fn plain(text: &str) -> Self {
    Self { body: adf_paragraph(text) }
  }
}

/// Wrap plain text in a minimal Atlassian Document Format document
pub fn adf_paragraph(text: &str) -> Value {
  json!({
    "type": "doc",
    "version": 1,
    "content": [{
      "type": "paragraph",
      "content": [{ "type": "text", "text": text }]
    }]
  })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraAttachment {
  pub id: String,
  pub filename: String,
  #[serde(default)]
  pub mime_type: Option<String>,
  #[serde(default)]
  pub size: u64,
  /// Download URL for the attachment content
  #[serde(default)]
  pub content: Option<String>,
}

/// One page of enhanced JQL search results
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
  #[serde(default)]
  pub next_page_token: Option<String>,
  #[serde(default)]
  pub is_last: Option<bool>,
}

/// The error body Jira returns with 4xx/5xx responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraErrorBody {
  #[serde(default)]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
}
