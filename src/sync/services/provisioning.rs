//! Best-effort creation of the label vocabulary on the tracker.

use tracing::{debug, info};

use crate::sync::{domain::LabelSet, ports::IssueTracker};

/// Outcome of one provisioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Labels the tracker accepted.
    pub created: usize,
    /// Labels the tracker refused, typically because they already exist.
    pub ignored: usize,
    /// Labels that would have been created had the run not been a dry run.
    pub planned: usize,
}

/// Ensures every label in `vocabulary` exists on the tracker.
///
/// Failures never abort the run. Each one is logged at debug level and
/// counted as ignored.
pub async fn provision_labels<T>(tracker: &T, vocabulary: &LabelSet, dry_run: bool) -> ProvisionReport
where
    T: IssueTracker + ?Sized,
{
    let mut report = ProvisionReport::default();
    if dry_run {
        report.planned = vocabulary.len();
        info!(labels = %vocabulary, "dry run: would ensure tracker labels exist");
        return report;
    }

    for label in vocabulary.iter() {
        match tracker.create_label(label).await {
            Ok(()) => report.created = report.created.saturating_add(1),
            Err(error) => {
                debug!(%label, %error, "label not created");
                report.ignored = report.ignored.saturating_add(1);
            }
        }
    }
    info!(
        created = report.created,
        ignored = report.ignored,
        "ensured tracker labels exist"
    );
    report
}
