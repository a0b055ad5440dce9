//! Reconciliation of local task records against the remote tracker.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{
    BodyLinks, ProvisionReport, RecordError, RecordFailure, RecordOutcome, RemoteIndex,
    SyncError, SyncSummary, SyncWarning, provision_labels, render_issue_body,
};
use crate::sync::{
    domain::{
        IssueDraft, PageSize, ReconciliationDecision, TaskId, TaskRecord, derive_labels,
        label_vocabulary,
    },
    ports::{IssueTracker, TaskRepository},
};

/// Explicit settings for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilerConfig {
    dry_run: bool,
    page_size: PageSize,
    links: BodyLinks,
}

impl ReconcilerConfig {
    /// Creates a configuration with mutations enabled and default paging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the page size used to list remote issues.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the links rendered into created issue bodies.
    #[must_use]
    pub fn with_links(mut self, links: BodyLinks) -> Self {
        self.links = links;
        self
    }

    /// Returns whether mutations are suppressed.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the remote listing page size.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns the issue body links.
    #[must_use]
    pub const fn links(&self) -> &BodyLinks {
        &self.links
    }
}

/// Computes the minimal remote mutation for `record`.
///
/// Pure: the decision depends only on the record and the index snapshot.
#[must_use]
pub fn decide(record: &TaskRecord, index: &RemoteIndex) -> ReconciliationDecision {
    let labels = derive_labels(record);
    let Some(issue) = index.lookup(&record.task_id()) else {
        return ReconciliationDecision::Create { labels };
    };
    if issue.is_closed() {
        return ReconciliationDecision::SkipClosed {
            issue: issue.number(),
        };
    }
    if *issue.labels() == labels {
        return ReconciliationDecision::NoOp {
            issue: issue.number(),
        };
    }
    ReconciliationDecision::UpdateLabels {
        issue: issue.number(),
        add_labels: labels,
    }
}

/// Drives one synchronisation pass from task files to tracker issues.
#[derive(Clone)]
pub struct Reconciler<T>
where
    T: IssueTracker,
{
    tracker: Arc<T>,
    config: ReconcilerConfig,
}

impl<T> Reconciler<T>
where
    T: IssueTracker,
{
    /// Creates a reconciler over `tracker`.
    #[must_use]
    pub const fn new(tracker: Arc<T>, config: ReconcilerConfig) -> Self {
        Self { tracker, config }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Ensures the label vocabulary exists on the tracker.
    pub async fn provision_labels(&self) -> ProvisionReport {
        provision_labels(&*self.tracker, &label_vocabulary(), self.config.dry_run).await
    }

    /// Builds the remote index snapshot for this run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RemoteFetch`] when any page cannot be listed.
    pub async fn build_index(&self) -> Result<RemoteIndex, SyncError> {
        RemoteIndex::build(&*self.tracker, self.config.page_size)
            .await
            .map_err(SyncError::RemoteFetch)
    }

    /// Computes and applies the decision for one record.
    ///
    /// In dry-run mode the intended mutation is logged and the outcome is
    /// returned with `applied` left unset.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Render`] when the issue body cannot be rendered
    /// and [`RecordError::RemoteMutation`] when the tracker call fails.
    pub async fn reconcile_record(
        &self,
        record: &TaskRecord,
        index: &RemoteIndex,
    ) -> Result<RecordOutcome, RecordError> {
        let task_id = record.task_id();
        let decision = decide(record, index);
        let mut outcome = RecordOutcome::new(task_id, record.source_path(), decision.clone());

        if !decision.is_mutation() {
            info!(%task_id, decision = decision.kind(), "{decision}");
            return Ok(outcome);
        }
        if self.config.dry_run {
            info!(%task_id, decision = decision.kind(), "dry run: would {decision}");
            return Ok(outcome);
        }

        match decision {
            ReconciliationDecision::Create { labels } => {
                let body = render_issue_body(record, &self.config.links)?;
                let draft = IssueDraft::new(record.issue_title(), body, labels);
                let number = self
                    .tracker
                    .create_issue(&draft)
                    .await
                    .map_err(|source| RecordError::RemoteMutation { task_id, source })?;
                info!(%task_id, issue = %number, "created issue");
                outcome.created = Some(number);
            }
            ReconciliationDecision::UpdateLabels { issue, add_labels } => {
                self.tracker
                    .add_labels(issue, &add_labels)
                    .await
                    .map_err(|source| RecordError::RemoteMutation { task_id, source })?;
                info!(%task_id, %issue, labels = %add_labels, "added labels");
            }
            ReconciliationDecision::SkipClosed { .. } | ReconciliationDecision::NoOp { .. } => {}
        }
        outcome.applied = true;
        Ok(outcome)
    }

    /// Runs a full reconciliation pass over `repository`.
    ///
    /// Labels are provisioned and the remote index is built before any task
    /// file is read. Records are then processed in scan order; cancellation is
    /// checked before each one.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the remote index cannot be built or the task
    /// files cannot be listed. Per-record failures are reported in the
    /// summary instead.
    pub async fn run<R>(
        &self,
        repository: &R,
        cancel: &CancellationToken,
    ) -> Result<SyncSummary, SyncError>
    where
        R: TaskRepository + ?Sized,
    {
        let mut summary = SyncSummary::new(self.config.dry_run);
        summary.labels = self.provision_labels().await;

        let index = self.build_index().await?;
        summary.untracked_remote = index.untracked();
        summary.warnings.extend(
            index
                .collisions()
                .iter()
                .copied()
                .map(SyncWarning::DuplicateRemoteIdentity),
        );

        let paths = repository.list().map_err(SyncError::Scan)?;
        info!(files = paths.len(), dry_run = self.config.dry_run, "reconciling task files");

        let mut claimed = HashMap::new();
        for path in paths {
            if cancel.is_cancelled() {
                warn!(next = %path, "cancellation requested; stopping");
                summary.cancelled = true;
                break;
            }
            self.process_path(repository, &path, &index, &mut claimed, &mut summary)
                .await;
        }

        info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "reconciliation finished"
        );
        Ok(summary)
    }

    #[instrument(skip_all, fields(%path))]
    async fn process_path<R>(
        &self,
        repository: &R,
        path: &Utf8Path,
        index: &RemoteIndex,
        claimed: &mut HashMap<TaskId, Utf8PathBuf>,
        summary: &mut SyncSummary,
    ) where
        R: TaskRepository + ?Sized,
    {
        let record = match repository.parse(path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("no task_id found; skipping");
                summary.record_skip();
                return;
            }
            Err(error) => {
                warn!(%error, "failed to parse task file");
                summary.record_failure(RecordFailure {
                    path: path.to_owned(),
                    task_id: None,
                    error: RecordError::Parse(error),
                });
                return;
            }
        };

        let task_id = record.task_id();
        match claimed.entry(task_id) {
            Entry::Occupied(first) => {
                let first_path = first.get().clone();
                warn!(%task_id, %first_path, "duplicate task id; skipping");
                summary.record_duplicate(SyncWarning::DuplicateLocalIdentity {
                    task_id,
                    path: path.to_owned(),
                    first_path,
                });
                return;
            }
            Entry::Vacant(slot) => {
                slot.insert(path.to_owned());
            }
        }

        match self.reconcile_record(&record, index).await {
            Ok(outcome) => summary.record_outcome(outcome),
            Err(error) => {
                warn!(%task_id, %error, "failed to reconcile task");
                summary.record_failure(RecordFailure {
                    path: path.to_owned(),
                    task_id: Some(task_id),
                    error,
                });
            }
        }
    }
}
