//! In-memory issue tracker for reconciliation tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::{IssueDraft, IssueNumber, IssueState, LabelSet, RemoteIssue, TaskId},
    ports::{IssuePage, IssueTracker, IssueTrackerError, IssueTrackerResult, PageRequest},
};

/// Call observed by [`InMemoryIssueTracker`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    /// A listing page was requested.
    ListIssues {
        /// Requested state.
        state: IssueState,
        /// Requested 1-based page.
        page: u32,
    },
    /// An issue creation was requested.
    CreateIssue(IssueDraft),
    /// Labels were added to an issue.
    AddLabels {
        /// Edited issue.
        issue: IssueNumber,
        /// Labels requested for addition.
        labels: LabelSet,
    },
    /// A label creation was requested.
    CreateLabel(String),
}

impl TrackerCall {
    /// Returns whether the call mutates tracker state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListIssues { .. })
    }

    /// Returns whether the call creates or edits an issue.
    #[must_use]
    pub const fn is_issue_mutation(&self) -> bool {
        matches!(self, Self::CreateIssue(_) | Self::AddLabels { .. })
    }
}

/// Thread-safe in-memory issue tracker.
///
/// The tracker records every call so tests can assert on the exact mutations
/// a reconciliation run performed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    issues: BTreeMap<IssueNumber, RemoteIssue>,
    labels: BTreeSet<String>,
    calls: Vec<TrackerCall>,
    listing_failure: Option<String>,
    rejected_tasks: HashSet<TaskId>,
}

impl InMemoryTrackerState {
    fn next_issue_number(&self) -> IssueTrackerResult<IssueNumber> {
        let next = self
            .issues
            .keys()
            .next_back()
            .map_or(1, |last| last.value().saturating_add(1));
        IssueNumber::new(next).map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))
    }

    fn is_rejected(&self, title: &str) -> bool {
        TaskId::decode(title).is_some_and(|task_id| self.rejected_tasks.contains(&task_id))
    }
}

fn lock_error(err: impl ToString) -> IssueTrackerError {
    IssueTrackerError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryIssueTracker {
    /// Creates an empty in-memory tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an existing remote issue, replacing one with the same number.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn insert_issue(&self, issue: RemoteIssue) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.issues.insert(issue.number(), issue);
        Ok(())
    }

    /// Makes every subsequent listing call fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn fail_listing(&self, reason: impl Into<String>) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.listing_failure = Some(reason.into());
        Ok(())
    }

    /// Rejects creations and label edits for issues carrying `task_id`.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn reject_mutations_for(&self, task_id: TaskId) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.rejected_tasks.insert(task_id);
        Ok(())
    }

    /// Returns the calls observed so far.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn calls(&self) -> IssueTrackerResult<Vec<TrackerCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }

    /// Returns the mutating calls observed so far.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn mutations(&self) -> IssueTrackerResult<Vec<TrackerCall>> {
        Ok(self
            .calls()?
            .into_iter()
            .filter(TrackerCall::is_mutation)
            .collect())
    }

    /// Returns the issue creations and label edits observed so far.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn issue_mutations(&self) -> IssueTrackerResult<Vec<TrackerCall>> {
        Ok(self
            .calls()?
            .into_iter()
            .filter(TrackerCall::is_issue_mutation)
            .collect())
    }

    /// Returns the stored issues ordered by number.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn issues(&self) -> IssueTrackerResult<Vec<RemoteIssue>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.issues.values().cloned().collect())
    }

    /// Returns the labels created so far.
    ///
    /// # Errors
    ///
    /// Returns tracker transport errors when lock acquisition fails.
    pub fn labels(&self) -> IssueTrackerResult<LabelSet> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.labels.iter().cloned().collect())
    }
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn list_issues(
        &self,
        issue_state: IssueState,
        page: PageRequest,
    ) -> IssueTrackerResult<IssuePage> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::ListIssues {
            state: issue_state,
            page: page.page(),
        });
        if let Some(reason) = &state.listing_failure {
            return Err(IssueTrackerError::rejected("list_issues", reason.clone()));
        }

        let size = usize::try_from(page.size().get())
            .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))?;
        let preceding = usize::try_from(page.page().saturating_sub(1))
            .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))?
            .saturating_mul(size);
        let matching: Vec<&RemoteIssue> = state
            .issues
            .values()
            .filter(|issue| issue.state() == issue_state)
            .collect();
        let issues: Vec<RemoteIssue> = matching
            .iter()
            .skip(preceding)
            .take(size)
            .map(|issue| (*issue).clone())
            .collect();
        let has_more = matching.len() > preceding.saturating_add(size);
        Ok(IssuePage { issues, has_more })
    }

    async fn create_issue(&self, draft: &IssueDraft) -> IssueTrackerResult<IssueNumber> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::CreateIssue(draft.clone()));
        if state.is_rejected(draft.title()) {
            return Err(IssueTrackerError::rejected(
                "create_issue",
                format!("creation refused for '{}'", draft.title()),
            ));
        }

        let number = state.next_issue_number()?;
        let issue = RemoteIssue::new(number, draft.title(), IssueState::Open)
            .with_body(draft.body())
            .with_labels(draft.labels().iter());
        state.issues.insert(number, issue);
        Ok(number)
    }

    async fn add_labels(&self, issue: IssueNumber, labels: &LabelSet) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::AddLabels {
            issue,
            labels: labels.clone(),
        });

        let rejected = state
            .issues
            .get(&issue)
            .is_some_and(|existing| state.is_rejected(existing.title()));
        if rejected {
            return Err(IssueTrackerError::rejected(
                "add_labels",
                format!("label edit refused for issue {issue}"),
            ));
        }
        let existing = state.issues.get_mut(&issue).ok_or_else(|| {
            IssueTrackerError::rejected("add_labels", format!("issue {issue} not found"))
        })?;
        existing.add_labels(labels);
        Ok(())
    }

    async fn create_label(&self, name: &str) -> IssueTrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::CreateLabel(name.to_owned()));
        if !state.labels.insert(name.to_owned()) {
            return Err(IssueTrackerError::rejected(
                "create_label",
                format!("label '{name}' already exists"),
            ));
        }
        Ok(())
    }
}
