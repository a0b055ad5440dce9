//! Local task record parsed from a task file.

use super::TaskId;
use camino::{Utf8Path, Utf8PathBuf};

/// Title used when the task file does not declare one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Status used when the task file does not declare one.
pub const DEFAULT_STATUS: &str = "Unknown";

/// Priority used when the task file does not declare one.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Declarative unit of work read from the task directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    task_id: TaskId,
    title: String,
    status: String,
    priority: String,
    estimate: Option<f64>,
    assignee: Option<String>,
    content: String,
    source_path: Utf8PathBuf,
}

impl TaskRecord {
    /// Creates a record with default title, status and priority.
    ///
    /// `source_path` is relative to the task root.
    #[must_use]
    pub fn new(task_id: TaskId, source_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            task_id,
            title: DEFAULT_TITLE.to_owned(),
            status: DEFAULT_STATUS.to_owned(),
            priority: DEFAULT_PRIORITY.to_owned(),
            estimate: None,
            assignee: None,
            content: String::new(),
            source_path: source_path.into(),
        }
    }

    /// Sets the title; blank values keep the default.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let value = title.into();
        let normalized = value.trim();
        if !normalized.is_empty() {
            normalized.clone_into(&mut self.title);
        }
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into().trim().to_owned();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into().trim().to_owned();
        self
    }

    /// Sets the estimate.
    #[must_use]
    pub fn with_estimate(mut self, estimate: f64) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Sets the assignee; blank values clear it.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        let value = assignee.into();
        let normalized = value.trim();
        self.assignee = (!normalized.is_empty()).then(|| normalized.to_owned());
        self
    }

    /// Sets the free-text body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw status value.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the raw priority value.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Returns the estimate, if any.
    #[must_use]
    pub const fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the free-text body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the path of the task file relative to the task root.
    #[must_use]
    pub fn source_path(&self) -> &Utf8Path {
        &self.source_path
    }

    /// Returns the remote issue title, `"<task_id>: <title>"`.
    #[must_use]
    pub fn issue_title(&self) -> String {
        format!("{}: {}", self.task_id.encode(), self.title)
    }
}
