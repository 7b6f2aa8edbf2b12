use tracing::instrument;

use crate::client::JiraClient;
use crate::error::ApiError;
use crate::models::JiraUser;

impl JiraClient {
  /// Get the user the client is authenticated as
  #[instrument(skip(self), level = "debug")]
  pub async fn get_myself(&self) -> Result<JiraUser, ApiError> {
    self.fetch_json(Self::endpoint("get_myself")?).await
  }
}
