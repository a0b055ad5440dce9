//! Shared world state for reconciliation BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use taskbridge::sync::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskRepository},
    domain::LabelSet,
    services::{Reconciler, ReconcilerConfig, SyncError, SyncSummary},
};

/// Reconciler type used by the BDD world.
pub type TestReconciler = Reconciler<InMemoryIssueTracker>;

/// Scenario world for reconciliation behaviour tests.
pub struct ReconciliationWorld {
    pub tracker: InMemoryIssueTracker,
    pub repository: InMemoryTaskRepository,
    pub last_summary: Option<Result<SyncSummary, SyncError>>,
}

impl ReconciliationWorld {
    /// Creates a world with no tasks and no remote issues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: InMemoryIssueTracker::new(),
            repository: InMemoryTaskRepository::new(),
            last_summary: None,
        }
    }

    /// Builds a reconciler sharing the world's tracker.
    #[must_use]
    pub fn reconciler(&self, dry_run: bool) -> TestReconciler {
        Reconciler::new(
            Arc::new(self.tracker.clone()),
            ReconcilerConfig::new().with_dry_run(dry_run),
        )
    }

    /// Returns the summary of the latest successful run.
    ///
    /// # Errors
    ///
    /// Returns an error when no run happened or the latest run failed.
    pub fn summary(&self) -> Result<&SyncSummary, eyre::Report> {
        self.last_summary
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no reconciliation run in scenario world"))?
            .as_ref()
            .map_err(|err| eyre::eyre!("reconciliation failed: {err}"))
    }
}

impl Default for ReconciliationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconciliationWorld {
    ReconciliationWorld::default()
}

/// Parses a comma-separated label list from a step.
pub fn label_list(labels: &str) -> LabelSet {
    labels.split(',').collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
