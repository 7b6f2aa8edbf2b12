use tracing::instrument;

use crate::client::JiraClient;
use crate::error::ApiError;
use crate::models::{JiraTransition, JiraTransitions, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue
  #[instrument(skip(self), level = "debug")]
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>, ApiError> {
    let operation = Self::endpoint("get_transitions")?.path_param("issueIdOrKey", issue_key);
    let transitions: JiraTransitions = self.fetch_json(operation).await?;
    Ok(transitions.transitions)
  }

  /// Transition an issue to a new status
  #[instrument(skip(self), level = "debug")]
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<(), ApiError> {
    let operation = Self::endpoint("do_transition")?
      .path_param("issueIdOrKey", issue_key)
      .body(Self::json_body(&TransitionRequest::new(transition_id))?);

    self.dispatcher.dispatch(operation).await?;
    Ok(())
  }
}
