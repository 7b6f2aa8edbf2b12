//! # Jira Issue Endpoints
//!
//! Fetching a single issue by ID or key.

use tracing::instrument;

use crate::client::JiraClient;
use crate::error::ApiError;
use crate::models::JiraIssue;

impl JiraClient {
  /// Get a Jira issue by key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue, ApiError> {
    let operation = Self::endpoint("get_issue")?
      .path_param("issueIdOrKey", issue_key)
      .query("fields", vec!["summary", "description", "status", "assignee"]);
    self.fetch_json(operation).await
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::create_jira_client;
  use crate::error::ErrorKind;

  #[tokio::test]
  async fn test_get_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock response for issue
    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .and(query_param("fields", "summary"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "id": "10000",
          "key": "TEST-123",
          "fields": {
              "summary": "Test issue",
              "description": null,
              "status": {
                  "id": "10001",
                  "name": "In Progress",
                  "statusCategory": {
                      "id": 4,
                      "key": "indeterminate",
                      "name": "In Progress"
                  }
              }
          }
      })))
      .mount(&mock_server)
      .await;

    let issue = client.get_issue("TEST-123").await?;
    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.status.name, "In Progress");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock 404 response
    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/NONEXISTENT-123"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("NONEXISTENT-123").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Issue does not exist"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unexpected_shape() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("TEST-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decoding);

    Ok(())
  }
}
