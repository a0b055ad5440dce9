//! Wire payloads returned by the GitHub REST API through `gh api`.

use serde::Deserialize;

use crate::sync::domain::{IssueNumber, IssueState, RemoteIssue, SyncDomainError};

/// Issue entry of `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct IssuePayload {
    pub(super) number: u64,
    pub(super) title: String,
    #[serde(default)]
    pub(super) body: Option<String>,
    #[serde(default)]
    pub(super) labels: Vec<LabelPayload>,
    pub(super) state: String,
    /// Present when the entry is a pull request rather than an issue.
    #[serde(default)]
    pub(super) pull_request: Option<serde_json::Value>,
}

/// Label entry embedded in an issue payload.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct LabelPayload {
    pub(super) name: String,
}

impl IssuePayload {
    pub(super) const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub(super) fn into_remote_issue(self) -> Result<RemoteIssue, SyncDomainError> {
        let number = IssueNumber::new(self.number)?;
        let state = IssueState::try_from(self.state.as_str())?;
        Ok(RemoteIssue::new(number, self.title, state)
            .with_body(self.body.unwrap_or_default())
            .with_labels(self.labels.into_iter().map(|label| label.name)))
    }
}
