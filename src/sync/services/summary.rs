//! Run outcomes, per-record failures and the aggregated run summary.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;

use super::{IndexCollision, IssueBodyError, ProvisionReport};
use crate::sync::{
    domain::{IssueNumber, ReconciliationDecision, TaskId},
    ports::{IssueTrackerError, TaskRepositoryError},
};

/// Fatal errors that abort a run before any record is reconciled.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The remote index could not be built.
    #[error("failed to fetch remote issues: {0}")]
    RemoteFetch(#[source] IssueTrackerError),
    /// The task directory could not be listed.
    #[error("failed to list task files: {0}")]
    Scan(#[source] TaskRepositoryError),
}

/// Errors confined to a single task record.
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    /// The task file could not be read or parsed.
    #[error(transparent)]
    Parse(#[from] TaskRepositoryError),
    /// The tracker refused or failed a mutation.
    #[error("remote mutation for {task_id} failed: {source}")]
    RemoteMutation {
        /// Task whose mutation failed.
        task_id: TaskId,
        /// Tracker failure.
        source: IssueTrackerError,
    },
    /// The issue body could not be rendered.
    #[error(transparent)]
    Render(#[from] IssueBodyError),
}

/// Non-fatal anomalies surfaced in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// Two task files declare the same identifier; the later one is skipped.
    DuplicateLocalIdentity {
        /// Shared identifier.
        task_id: TaskId,
        /// Skipped file.
        path: Utf8PathBuf,
        /// File that claimed the identifier first.
        first_path: Utf8PathBuf,
    },
    /// Two remote issues decode to the same identifier.
    DuplicateRemoteIdentity(IndexCollision),
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLocalIdentity {
                task_id,
                path,
                first_path,
            } => write!(
                f,
                "{path} reuses task id {task_id} already claimed by {first_path}; skipped"
            ),
            Self::DuplicateRemoteIdentity(collision) => write!(
                f,
                "issues {} and {} both carry task id {}; using {}",
                collision.replaced, collision.kept, collision.task_id, collision.kept
            ),
        }
    }
}

/// Result of reconciling one task record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    /// Reconciled task.
    pub task_id: TaskId,
    /// Source file of the task.
    pub path: Utf8PathBuf,
    /// Decision computed against the remote index.
    pub decision: ReconciliationDecision,
    /// Whether a mutation was sent to the tracker.
    pub applied: bool,
    /// Issue created for the task, when one was.
    pub created: Option<IssueNumber>,
}

impl RecordOutcome {
    pub(crate) fn new(task_id: TaskId, path: &Utf8Path, decision: ReconciliationDecision) -> Self {
        Self {
            task_id,
            path: path.to_owned(),
            decision,
            applied: false,
            created: None,
        }
    }
}

/// A task file that could not be reconciled.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Offending file.
    pub path: Utf8PathBuf,
    /// Task identifier, when parsing got that far.
    pub task_id: Option<TaskId>,
    /// Failure cause.
    pub error: RecordError,
}

/// Aggregated result of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Whether mutations were suppressed.
    pub dry_run: bool,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
    /// Task files examined.
    pub processed: usize,
    /// Records reconciled without error.
    pub succeeded: usize,
    /// Records that failed.
    pub failed: usize,
    /// Files without an identity and duplicate records.
    pub skipped: usize,
    /// Remote issues whose titles carry no task identifier.
    pub untracked_remote: usize,
    /// Label provisioning outcome.
    pub labels: ProvisionReport,
    /// Per-record outcomes in scan order.
    pub outcomes: Vec<RecordOutcome>,
    /// Per-record failures in scan order.
    pub failures: Vec<RecordFailure>,
    /// Non-fatal anomalies.
    pub warnings: Vec<SyncWarning>,
}

impl SyncSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Returns whether any record failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Counts outcomes whose decision has the given kind.
    #[must_use]
    pub fn count_decisions(&self, kind: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.decision.kind() == kind)
            .count()
    }

    pub(crate) fn record_outcome(&mut self, outcome: RecordOutcome) {
        self.processed = self.processed.saturating_add(1);
        self.succeeded = self.succeeded.saturating_add(1);
        self.outcomes.push(outcome);
    }

    pub(crate) fn record_failure(&mut self, failure: RecordFailure) {
        self.processed = self.processed.saturating_add(1);
        self.failed = self.failed.saturating_add(1);
        self.failures.push(failure);
    }

    pub(crate) const fn record_skip(&mut self) {
        self.processed = self.processed.saturating_add(1);
        self.skipped = self.skipped.saturating_add(1);
    }

    pub(crate) fn record_duplicate(&mut self, warning: SyncWarning) {
        self.record_skip();
        self.warnings.push(warning);
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "Dry run: no changes were made.")?;
        }
        writeln!(
            f,
            "Processed {} task files: {} succeeded, {} failed, {} skipped.",
            self.processed, self.succeeded, self.failed, self.skipped
        )?;
        writeln!(
            f,
            "Decisions: {} create, {} update-labels, {} no-op, {} skip-closed.",
            self.count_decisions("create"),
            self.count_decisions("update-labels"),
            self.count_decisions("no-op"),
            self.count_decisions("skip-closed"),
        )?;
        if self.untracked_remote > 0 {
            writeln!(
                f,
                "Ignored {} remote issues without a task id.",
                self.untracked_remote
            )?;
        }
        for failure in &self.failures {
            writeln!(f, "  failed {}: {}", failure.path, failure.error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        if self.cancelled {
            writeln!(f, "Run cancelled before all task files were processed.")?;
        }
        Ok(())
    }
}
