//! Error types for synchronisation domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain synchronisation values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// The value does not follow the `PREFIX-NNN[LETTER]` identity grammar.
    #[error("invalid task identifier '{0}', expected PREFIX-NNN with an optional letter")]
    InvalidTaskId(String),

    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The issue number is invalid.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(u64),

    /// The issue state is neither open nor closed.
    #[error("unknown issue state: {0}")]
    InvalidIssueState(String),

    /// The listing page size is outside the tracker ceiling.
    #[error("invalid page size {0}, expected a value between 1 and 100")]
    InvalidPageSize(u32),
}
