use tracing::instrument;

use crate::client::JiraClient;
use crate::error::ApiError;
use crate::models::{CommentRequest, JiraComment};

impl JiraClient {
  /// Add a plain-text comment to an issue
  #[instrument(skip(self, text), level = "debug")]
  pub async fn add_comment(&self, issue_key: &str, text: &str) -> Result<JiraComment, ApiError> {
    let operation = Self::endpoint("add_comment")?
      .path_param("issueIdOrKey", issue_key)
      .body(Self::json_body(&CommentRequest::plain(text))?);
    self.fetch_json(operation).await
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_partial_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::create_jira_client;

  #[tokio::test]
  async fn test_add_comment() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue/TEST-5/comment"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_partial_json(serde_json::json!({
          "body": { "type": "doc", "version": 1 }
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
          "id": "10010",
          "body": {
              "type": "doc",
              "version": 1,
              "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Ship it" }] }]
          },
          "created": "2026-01-14T09:21:04.000+0000"
      })))
      .mount(&mock_server)
      .await;

    let comment = client.add_comment("TEST-5", "Ship it").await?;
    assert_eq!(comment.id, "10010");
    assert_eq!(comment.body["content"][0]["content"][0]["text"], "Ship it");
    assert!(comment.author.is_none());

    Ok(())
  }
}
