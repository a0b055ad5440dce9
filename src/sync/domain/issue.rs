//! Remote issue value objects.

use super::{IssueNumber, LabelSet, SyncDomainError, TaskId};
use std::fmt;

/// Lifecycle state of a remote issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueState {
    /// The issue is open.
    Open,
    /// The issue is closed.
    Closed,
}

impl IssueState {
    /// Returns the state name as used by the tracker API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for IssueState {
    type Error = SyncDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(SyncDomainError::InvalidIssueState(value.to_owned())),
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue as listed by the remote tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    number: IssueNumber,
    title: String,
    body: String,
    labels: LabelSet,
    state: IssueState,
}

impl RemoteIssue {
    /// Creates an issue snapshot with an empty body and no labels.
    #[must_use]
    pub fn new(number: IssueNumber, title: impl Into<String>, state: IssueState) -> Self {
        Self {
            number,
            title: title.into(),
            body: String::new(),
            labels: LabelSet::new(),
            state,
        }
    }

    /// Sets the issue body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the issue labels.
    #[must_use]
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Returns the issue number.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }

    /// Returns the issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issue body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the labels currently applied to the issue.
    #[must_use]
    pub const fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Returns the issue state.
    #[must_use]
    pub const fn state(&self) -> IssueState {
        self.state
    }

    /// Returns whether the issue is closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, IssueState::Closed)
    }

    /// Decodes the task identifier carried in the title.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        TaskId::decode(&self.title)
    }

    /// Adds labels to the snapshot, keeping existing ones.
    pub fn add_labels(&mut self, labels: &LabelSet) {
        self.labels.extend(labels.iter());
    }
}

/// Payload of an issue creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    title: String,
    body: String,
    labels: LabelSet,
}

impl IssueDraft {
    /// Creates an issue draft.
    #[must_use]
    pub const fn new(title: String, body: String, labels: LabelSet) -> Self {
        Self {
            title,
            body,
            labels,
        }
    }

    /// Returns the issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rendered issue body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the labels to apply at creation.
    #[must_use]
    pub const fn labels(&self) -> &LabelSet {
        &self.labels
    }
}
