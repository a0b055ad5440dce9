//! Front matter splitting and decoding for Markdown task files.
//!
//! A task file opens with a `---` fence, carries a YAML mapping, closes with
//! a second `---` fence and continues with the free-text body.

use camino::Utf8Path;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;

use crate::sync::{
    domain::{TaskId, TaskRecord},
    ports::{TaskRepositoryError, TaskRepositoryResult},
};

const FENCE: &str = "---";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Metadata block keys read from a task file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct TaskFrontMatter {
    #[serde(default)]
    task_id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    estimate: Option<Value>,
    #[serde(default)]
    assignee: Option<Value>,
}

/// Task file split into its metadata block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawDocument {
    pub(super) front_matter: Option<String>,
    pub(super) body: String,
}

/// Splits a task file into metadata and body.
///
/// Files that do not open with a fence have no metadata. An opening fence
/// without a closing one is malformed.
pub(super) fn split_document(text: &str) -> Result<RawDocument, String> {
    let content = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut lines = content.split_inclusive('\n');
    let opens_with_fence = lines
        .next()
        .is_some_and(|first| first.trim_end() == FENCE);
    if !opens_with_fence {
        return Ok(RawDocument {
            front_matter: None,
            body: content.to_owned(),
        });
    }

    let mut front_matter = String::new();
    let mut closed = false;
    for line in &mut lines {
        if line.trim_end() == FENCE {
            closed = true;
            break;
        }
        front_matter.push_str(line);
    }
    if !closed {
        return Err("front matter is missing its closing '---' fence".to_owned());
    }

    Ok(RawDocument {
        front_matter: Some(front_matter),
        body: lines.collect(),
    })
}

/// Parses a task file into a record.
///
/// Returns `Ok(None)` when the file has no metadata or a missing or blank
/// `task_id`. A non-numeric `estimate` is dropped with a warning.
pub(super) fn parse_task_document(
    path: &Utf8Path,
    text: &str,
) -> TaskRepositoryResult<Option<TaskRecord>> {
    let document =
        split_document(text).map_err(|reason| TaskRepositoryError::parse(path, reason))?;
    let Some(front_matter) = document
        .front_matter
        .filter(|block| !block.trim().is_empty())
    else {
        return Ok(None);
    };

    let metadata: TaskFrontMatter = serde_yaml::from_str(&front_matter)
        .map_err(|err| TaskRepositoryError::parse(path, err.to_string()))?;
    let field = |name: &str, value: Option<Value>| {
        scalar_text(value)
            .map_err(|reason| TaskRepositoryError::parse(path, format!("{name}: {reason}")))
    };

    let Some(raw_task_id) = field("task_id", metadata.task_id)?
        .filter(|value| !value.trim().is_empty())
    else {
        return Ok(None);
    };
    let task_id = raw_task_id
        .trim()
        .parse::<TaskId>()
        .map_err(|err| TaskRepositoryError::parse(path, err.to_string()))?;

    let mut record = TaskRecord::new(task_id, path).with_content(document.body.trim());
    if let Some(title) = field("title", metadata.title)? {
        record = record.with_title(title);
    }
    if let Some(status) = field("status", metadata.status)? {
        record = record.with_status(status);
    }
    if let Some(priority) = field("priority", metadata.priority)? {
        record = record.with_priority(priority);
    }
    if let Some(assignee) = field("assignee", metadata.assignee)? {
        record = record.with_assignee(assignee);
    }
    match scalar_number(metadata.estimate) {
        Ok(Some(value)) => record = record.with_estimate(value),
        Ok(None) => {}
        Err(reason) => warn!(%path, %reason, "ignoring estimate"),
    }
    Ok(Some(record))
}

/// Renders a scalar YAML value as text; null and missing values are `None`.
fn scalar_text(value: Option<Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_)) => {
            Err("expected a scalar value".to_owned())
        }
    }
}

/// Reads an optional numeric YAML value; numeric strings are accepted.
fn scalar_number(value: Option<Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{number} is not representable")),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("expected a number, found '{text}'")),
        Some(_) => Err("expected a number".to_owned()),
    }
}
