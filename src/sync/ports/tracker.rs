//! Remote tracker port for issue listing and mutation.

use crate::sync::domain::{IssueDraft, IssueNumber, IssueState, LabelSet, PageSize, RemoteIssue};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote tracker operations.
pub type IssueTrackerResult<T> = Result<T, IssueTrackerError>;

/// One page of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: PageSize,
}

impl PageRequest {
    /// Returns the request for the first page.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self { page: 1, size }
    }

    /// Returns the request for the following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size ceiling.
    #[must_use]
    pub const fn size(self) -> PageSize {
        self.size
    }
}

/// Issues returned for one [`PageRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePage {
    /// Issues on this page.
    pub issues: Vec<RemoteIssue>,
    /// Whether the page-size ceiling was reached and another page may follow.
    pub has_more: bool,
}

/// Capability contract for the remote issue tracker.
///
/// Listing is read-only; every other operation mutates remote state.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists one page of issues in the given state.
    async fn list_issues(
        &self,
        state: IssueState,
        page: PageRequest,
    ) -> IssueTrackerResult<IssuePage>;

    /// Creates an issue and returns its number.
    async fn create_issue(&self, draft: &IssueDraft) -> IssueTrackerResult<IssueNumber>;

    /// Adds labels to an issue without removing existing ones.
    async fn add_labels(&self, issue: IssueNumber, labels: &LabelSet) -> IssueTrackerResult<()>;

    /// Creates a label.
    async fn create_label(&self, name: &str) -> IssueTrackerResult<()>;
}

/// Errors returned by remote tracker adapters.
#[derive(Debug, Clone, Error)]
pub enum IssueTrackerError {
    /// The tracker command exited unsuccessfully.
    #[error("command `{command}` failed: {stderr}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Diagnostic output of the command.
        stderr: String,
    },

    /// The tracker answered with a payload that could not be interpreted.
    #[error("invalid tracker response: {0}")]
    InvalidResponse(String),

    /// The tracker refused the operation.
    #[error("tracker rejected {operation}: {reason}")]
    Rejected {
        /// Operation name.
        operation: &'static str,
        /// Rejection reason.
        reason: String,
    },

    /// The tracker could not be reached.
    #[error("tracker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueTrackerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Builds a rejection error.
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}
