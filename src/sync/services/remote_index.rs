//! Snapshot of remote issues keyed by decoded task identifier.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::sync::{
    domain::{IssueNumber, IssueState, PageSize, RemoteIssue, TaskId},
    ports::{IssueTracker, IssueTrackerResult, PageRequest},
};

/// Listing order; later states overwrite earlier ones on collision.
const LISTING_ORDER: [IssueState; 2] = [IssueState::Open, IssueState::Closed];

/// Two remote issues decoded to the same task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCollision {
    /// Shared task identifier.
    pub task_id: TaskId,
    /// Issue kept in the index (the later-scanned one).
    pub kept: IssueNumber,
    /// Issue dropped from the index.
    pub replaced: IssueNumber,
}

/// Immutable per-run snapshot of remote issues.
///
/// The index is built once before any mutation and never re-fetched, so
/// every decision in a run sees the same remote state.
#[derive(Debug, Clone, Default)]
pub struct RemoteIndex {
    issues: HashMap<TaskId, RemoteIssue>,
    collisions: Vec<IndexCollision>,
    untracked: usize,
}

impl RemoteIndex {
    /// Lists open then closed issues, page by page, and indexes them.
    ///
    /// # Errors
    ///
    /// Returns the first tracker error; a partial index is never returned.
    pub async fn build<T>(tracker: &T, page_size: PageSize) -> IssueTrackerResult<Self>
    where
        T: IssueTracker + ?Sized,
    {
        let mut index = Self::default();
        for state in LISTING_ORDER {
            let mut request = PageRequest::first(page_size);
            loop {
                let page = tracker.list_issues(state, request).await?;
                debug!(
                    %state,
                    page = request.page(),
                    issues = page.issues.len(),
                    has_more = page.has_more,
                    "fetched remote issue page"
                );
                index.extend(page.issues);
                if !page.has_more {
                    break;
                }
                request = request.next();
            }
        }

        info!(
            indexed = index.len(),
            collisions = index.collisions.len(),
            untracked = index.untracked,
            "built remote issue index"
        );
        Ok(index)
    }

    /// Indexes issues in the given order without contacting a tracker.
    #[must_use]
    pub fn from_issues(issues: impl IntoIterator<Item = RemoteIssue>) -> Self {
        let mut index = Self::default();
        index.extend(issues);
        index
    }

    /// Returns the issue carrying `task_id`, if any.
    #[must_use]
    pub fn lookup(&self, task_id: &TaskId) -> Option<&RemoteIssue> {
        self.issues.get(task_id)
    }

    /// Returns the number of indexed task identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns whether no issue carried a task identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the identifier collisions observed while indexing.
    #[must_use]
    pub fn collisions(&self) -> &[IndexCollision] {
        &self.collisions
    }

    /// Returns how many issues had no task identifier in their title.
    #[must_use]
    pub const fn untracked(&self) -> usize {
        self.untracked
    }

    fn extend(&mut self, issues: impl IntoIterator<Item = RemoteIssue>) {
        for issue in issues {
            self.insert(issue);
        }
    }

    fn insert(&mut self, issue: RemoteIssue) {
        let Some(task_id) = issue.task_id() else {
            self.untracked = self.untracked.saturating_add(1);
            return;
        };
        let kept = issue.number();
        if let Some(previous) = self.issues.insert(task_id, issue) {
            let replaced = previous.number();
            warn!(
                %task_id,
                %kept,
                %replaced,
                "remote issues share a task identifier; keeping the later one"
            );
            self.collisions.push(IndexCollision {
                task_id,
                kept,
                replaced,
            });
        }
    }
}
