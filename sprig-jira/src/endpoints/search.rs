use tracing::instrument;

use crate::client::JiraClient;
use crate::error::ApiError;
use crate::models::SearchResults;

/// Options for a JQL search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions<'a> {
  /// Fields to return; each becomes a repeated `fields` key
  pub fields: Vec<&'a str>,
  pub expand: Vec<&'a str>,
  pub max_results: Option<u32>,
  /// Token from the previous page's `nextPageToken`
  pub next_page_token: Option<&'a str>,
}

impl JiraClient {
  /// Search for issues with JQL
  #[instrument(skip(self, options), level = "debug")]
  pub async fn search_issues(&self, jql: &str, options: SearchOptions<'_>) -> Result<SearchResults, ApiError> {
    let operation = Self::endpoint("search_jql")?
      .query("jql", jql)
      .query("fields", options.fields)
      .query("expand", options.expand)
      .query("maxResults", options.max_results)
      .query("nextPageToken", options.next_page_token);
    self.fetch_json(operation).await
  }
}
