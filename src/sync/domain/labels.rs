//! Label sets and the pure derivation of labels from task records.

use super::TaskRecord;
use std::collections::BTreeSet;
use std::fmt;

/// Status values and the label each maps to. Matching is exact.
const STATUS_LABELS: &[(&str, &str)] = &[
    ("Backlog", "status:backlog"),
    ("Ready", "status:ready"),
    ("InProgress", "status:in-progress"),
    ("In Progress", "status:in-progress"),
    ("Review", "status:review"),
    ("Done", "status:done"),
    ("Completed", "status:done"),
    ("Blocked", "status:blocked"),
    ("Cancelled", "status:cancelled"),
    ("Draft", "status:draft"),
    ("Planned", "status:planned"),
    ("ON_HOLD", "status:on-hold"),
];

/// Priority substrings in match order; the first contained substring wins.
const PRIORITY_LABELS: &[(&str, &str)] = &[
    ("Critical", "priority:critical"),
    ("High", "priority:high"),
    ("Medium", "priority:medium"),
    ("Low", "priority:low"),
];

/// Source-path substrings in match order; at most one label is added.
const PATH_LABELS: &[(&str, &str)] = &[
    ("planning-system", "component:planning"),
    ("week1", "sprint:1"),
    ("week2", "sprint:2"),
];

/// Generic label provisioned alongside the derived vocabulary.
pub const TASK_LABEL: &str = "task";

/// Ordered set of tracker labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    /// Creates an empty label set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds a label, ignoring blank values.
    ///
    /// Returns `true` when the label was not already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let raw = label.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return false;
        }
        self.0.insert(normalized.to_owned())
    }

    /// Returns whether the set holds `label`.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates labels in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Joins labels with commas, the form the tracker CLI accepts.
    #[must_use]
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels = Self::new();
        for label in iter {
            labels.insert(label);
        }
        labels
    }
}

impl<S: Into<String>> Extend<S> for LabelSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for label in iter {
            self.insert(label);
        }
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().collect::<Vec<_>>().join(", "))
    }
}

/// Derives the canonical label set for a task record.
///
/// The result holds at most one status label, at most one priority label and
/// at most one path label. The function performs no I/O.
#[must_use]
pub fn derive_labels(record: &TaskRecord) -> LabelSet {
    let mut labels = LabelSet::new();

    if let Some(label) = status_label(record.status()) {
        labels.insert(label);
    }
    if let Some(label) = priority_label(record.priority()) {
        labels.insert(label);
    }
    if let Some(label) = path_label(record.source_path().as_str()) {
        labels.insert(label);
    }
    labels
}

/// Returns every label the derivation rules can produce plus [`TASK_LABEL`].
#[must_use]
pub fn label_vocabulary() -> LabelSet {
    STATUS_LABELS
        .iter()
        .chain(PRIORITY_LABELS)
        .chain(PATH_LABELS)
        .map(|(_, label)| *label)
        .chain([TASK_LABEL])
        .collect()
}

fn status_label(status: &str) -> Option<&'static str> {
    STATUS_LABELS
        .iter()
        .find(|(value, _)| *value == status)
        .map(|(_, label)| *label)
}

fn priority_label(priority: &str) -> Option<&'static str> {
    PRIORITY_LABELS
        .iter()
        .find(|(needle, _)| priority.contains(needle))
        .map(|(_, label)| *label)
}

fn path_label(source_path: &str) -> Option<&'static str> {
    PATH_LABELS
        .iter()
        .find(|(needle, _)| source_path.contains(needle))
        .map(|(_, label)| *label)
}
