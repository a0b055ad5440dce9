//! Domain model for task-to-issue synchronisation.
//!
//! The domain covers task identity, local task records, remote issue
//! snapshots, label derivation and reconciliation decisions while keeping
//! all infrastructure concerns outside of the domain boundary.

mod decision;
mod error;
mod ids;
mod issue;
mod labels;
mod record;

pub use decision::ReconciliationDecision;
pub use error::SyncDomainError;
pub use ids::{IssueNumber, PageSize, RepositoryFullName, TaskId, TaskPrefix};
pub use issue::{IssueDraft, IssueState, RemoteIssue};
pub use labels::{LabelSet, TASK_LABEL, derive_labels, label_vocabulary};
pub use record::{DEFAULT_PRIORITY, DEFAULT_STATUS, DEFAULT_TITLE, TaskRecord};
