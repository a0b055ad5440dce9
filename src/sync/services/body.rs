//! Issue body rendering for newly created issues.

use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::sync::domain::{TaskId, TaskRecord};

/// Default directory prefix used to link back to task files.
pub const DEFAULT_LINK_ROOT: &str = "tasks";

/// Sprint document linked from issue bodies unless overridden.
pub const DEFAULT_SPRINT_LINK: &str = "planning/current-sprint.md";

const MISSING_ESTIMATE: &str = "TBD";
const MISSING_ASSIGNEE: &str = "Unassigned";
const MISSING_DESCRIPTION: &str = "See task file for details.";

const ISSUE_BODY_TEMPLATE: &str = "## Task Details

**Task ID**: `{{ task_id }}`
**Status**: {{ status }}
**Priority**: {{ priority }}
**Estimate**: {{ estimate }}
**Assignee**: {{ assignee }}

## Description

{{ description }}

## Links

- [Task File]({{ task_link }})
{%- if sprint_link %}
- [Current Sprint]({{ sprint_link }})
{%- endif %}

---
*This issue is automatically synchronized with the task file.*
";

/// Link targets embedded in rendered issue bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLinks {
    link_root: String,
    sprint_link: Option<String>,
}

impl BodyLinks {
    /// Creates links rooted at `link_root`.
    #[must_use]
    pub fn new(link_root: impl Into<String>) -> Self {
        Self {
            link_root: link_root.into(),
            sprint_link: None,
        }
    }

    /// Sets the link to the current sprint document; a blank value removes it.
    #[must_use]
    pub fn with_sprint_link(mut self, sprint_link: impl Into<String>) -> Self {
        let link = sprint_link.into();
        self.sprint_link = (!link.trim().is_empty()).then_some(link);
        self
    }

    /// Returns the directory prefix for task file links.
    #[must_use]
    pub fn link_root(&self) -> &str {
        &self.link_root
    }

    /// Returns the sprint link, if configured.
    #[must_use]
    pub fn sprint_link(&self) -> Option<&str> {
        self.sprint_link.as_deref()
    }

    /// Builds the link to a task file relative to the repository root.
    #[must_use]
    pub fn task_link(&self, record: &TaskRecord) -> String {
        let root = self.link_root.trim_end_matches('/');
        if root.is_empty() {
            record.source_path().to_string()
        } else {
            format!("{root}/{}", record.source_path())
        }
    }
}

impl Default for BodyLinks {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_ROOT).with_sprint_link(DEFAULT_SPRINT_LINK)
    }
}

/// Issue body rendering failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render issue body for {task_id}: {reason}")]
pub struct IssueBodyError {
    /// Task whose body could not be rendered.
    pub task_id: TaskId,
    /// Template engine diagnostic.
    pub reason: String,
}

/// Renders the Markdown body of the issue created for `record`.
///
/// # Errors
///
/// Returns [`IssueBodyError`] when the template engine fails.
pub fn render_issue_body(record: &TaskRecord, links: &BodyLinks) -> Result<String, IssueBodyError> {
    let environment = Environment::new();
    environment
        .render_str(ISSUE_BODY_TEMPLATE, build_body_context(record, links))
        .map_err(|error| IssueBodyError {
            task_id: record.task_id(),
            reason: error.to_string(),
        })
}

fn build_body_context(record: &TaskRecord, links: &BodyLinks) -> Map<String, Value> {
    let estimate = record
        .estimate()
        .map_or_else(|| MISSING_ESTIMATE.to_owned(), |hours| hours.to_string());
    let assignee = record.assignee().unwrap_or(MISSING_ASSIGNEE);
    let description = if record.content().is_empty() {
        MISSING_DESCRIPTION
    } else {
        record.content()
    };

    let mut context = Map::new();
    context.insert("task_id".to_owned(), Value::String(record.task_id().encode()));
    context.insert("status".to_owned(), Value::String(record.status().to_owned()));
    context.insert(
        "priority".to_owned(),
        Value::String(record.priority().to_owned()),
    );
    context.insert("estimate".to_owned(), Value::String(estimate));
    context.insert("assignee".to_owned(), Value::String(assignee.to_owned()));
    context.insert(
        "description".to_owned(),
        Value::String(description.to_owned()),
    );
    context.insert("task_link".to_owned(), Value::String(links.task_link(record)));
    context.insert(
        "sprint_link".to_owned(),
        links
            .sprint_link()
            .map_or(Value::Null, |link| Value::String(link.to_owned())),
    );
    context
}
