//! Service layer orchestrating remote indexing, label provisioning and
//! per-record reconciliation.

mod body;
mod provisioning;
mod reconciler;
mod remote_index;
mod summary;

pub use body::{
    BodyLinks, DEFAULT_LINK_ROOT, DEFAULT_SPRINT_LINK, IssueBodyError, render_issue_body,
};
pub use provisioning::{ProvisionReport, provision_labels};
pub use reconciler::{Reconciler, ReconcilerConfig, decide};
pub use remote_index::{IndexCollision, RemoteIndex};
pub use summary::{
    RecordError, RecordFailure, RecordOutcome, SyncError, SyncSummary, SyncWarning,
};
