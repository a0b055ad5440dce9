//! Shared fixtures for in-memory reconciliation integration tests.

use std::sync::Arc;

use rstest::fixture;
use taskbridge::sync::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskRepository, TrackerCall},
    domain::{IssueNumber, IssueState, RemoteIssue, TaskId, TaskRecord},
    services::{Reconciler, ReconcilerConfig, SyncError, SyncSummary},
};
use tokio_util::sync::CancellationToken;

/// Tracker and repository pair shared by a test.
pub struct Workspace {
    pub tracker: InMemoryIssueTracker,
    pub repository: InMemoryTaskRepository,
}

impl Workspace {
    /// Seeds a remote issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue number is invalid or the tracker lock
    /// is poisoned.
    pub fn issue(
        &self,
        number: u64,
        title: &str,
        state: IssueState,
        labels: &[&str],
    ) -> Result<(), eyre::Report> {
        let issue = RemoteIssue::new(IssueNumber::new(number)?, title, state)
            .with_labels(labels.iter().copied());
        self.tracker.insert_issue(issue)?;
        Ok(())
    }

    /// Seeds a parsed task record.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository lock is poisoned.
    pub fn task(&self, record: TaskRecord) -> Result<(), eyre::Report> {
        self.repository.insert(record)?;
        Ok(())
    }

    /// Runs one reconciliation pass.
    ///
    /// # Errors
    ///
    /// Returns the fatal run error, if any.
    pub async fn run(&self, dry_run: bool) -> Result<SyncSummary, SyncError> {
        let reconciler = Reconciler::new(
            Arc::new(self.tracker.clone()),
            ReconcilerConfig::new().with_dry_run(dry_run),
        );
        reconciler
            .run(&self.repository, &CancellationToken::new())
            .await
    }

    /// Returns issue creations and label edits recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker lock is poisoned.
    pub fn issue_mutations(&self) -> Result<Vec<TrackerCall>, eyre::Report> {
        Ok(self.tracker.issue_mutations()?)
    }
}

/// Provides an empty tracker and repository.
#[fixture]
pub fn workspace() -> Workspace {
    Workspace {
        tracker: InMemoryIssueTracker::new(),
        repository: InMemoryTaskRepository::new(),
    }
}

/// Parses a task identifier.
///
/// # Errors
///
/// Returns an error if `value` is not a well-formed identifier.
pub fn task_id(value: &str) -> Result<TaskId, eyre::Report> {
    Ok(value.parse()?)
}
