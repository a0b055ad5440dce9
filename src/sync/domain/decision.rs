//! Per-record reconciliation decisions.

use super::{IssueNumber, LabelSet};
use std::fmt;

/// Minimal remote mutation computed for one task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationDecision {
    /// No remote issue carries the task identifier; one must be created.
    Create {
        /// Labels applied at creation, equal to the derived set.
        labels: LabelSet,
    },
    /// The open issue's labels differ from the derived set.
    UpdateLabels {
        /// Issue to edit.
        issue: IssueNumber,
        /// Labels to add. Existing remote labels are never removed.
        add_labels: LabelSet,
    },
    /// The issue is closed and is never mutated.
    SkipClosed {
        /// Closed issue.
        issue: IssueNumber,
    },
    /// The open issue already carries exactly the derived labels.
    NoOp {
        /// Matching issue.
        issue: IssueNumber,
    },
}

impl ReconciliationDecision {
    /// Returns a stable name for reports and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::UpdateLabels { .. } => "update-labels",
            Self::SkipClosed { .. } => "skip-closed",
            Self::NoOp { .. } => "no-op",
        }
    }

    /// Returns whether applying the decision mutates remote state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Create { .. } | Self::UpdateLabels { .. })
    }

    /// Returns the existing issue the decision refers to, if any.
    #[must_use]
    pub const fn issue(&self) -> Option<IssueNumber> {
        match self {
            Self::Create { .. } => None,
            Self::UpdateLabels { issue, .. }
            | Self::SkipClosed { issue }
            | Self::NoOp { issue } => Some(*issue),
        }
    }
}

impl fmt::Display for ReconciliationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { labels } => write!(f, "create issue with labels {labels}"),
            Self::UpdateLabels { issue, add_labels } => {
                write!(f, "add labels {add_labels} to issue {issue}")
            }
            Self::SkipClosed { issue } => write!(f, "skip closed issue {issue}"),
            Self::NoOp { issue } => write!(f, "issue {issue} is up to date"),
        }
    }
}
