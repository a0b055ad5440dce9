//! Then steps for reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, label_list};
use rstest_bdd_macros::then;
use taskbridge::sync::{
    adapters::memory::TrackerCall, domain::IssueDraft, services::SyncWarning,
};

fn created_drafts(world: &ReconciliationWorld) -> Result<Vec<IssueDraft>, eyre::Report> {
    Ok(world
        .tracker
        .issue_mutations()?
        .into_iter()
        .filter_map(|call| match call {
            TrackerCall::CreateIssue(draft) => Some(draft),
            _ => None,
        })
        .collect())
}

#[then(r#"exactly one issue is created titled "{title}""#)]
fn one_issue_created(world: &ReconciliationWorld, title: String) -> Result<(), eyre::Report> {
    let drafts = created_drafts(world)?;
    let titles: Vec<&str> = drafts.iter().map(IssueDraft::title).collect();
    eyre::ensure!(
        titles == [title.as_str()],
        "expected one creation titled {title}, found {titles:?}"
    );
    Ok(())
}

#[then(r#"the created issue carries labels "{labels}""#)]
fn created_issue_labels(world: &ReconciliationWorld, labels: String) -> Result<(), eyre::Report> {
    let drafts = created_drafts(world)?;
    let draft = drafts
        .first()
        .ok_or_else(|| eyre::eyre!("no issue was created"))?;
    let expected = label_list(&labels);
    eyre::ensure!(
        draft.labels() == &expected,
        "expected labels {expected}, found {}",
        draft.labels()
    );
    Ok(())
}

#[then(r#"issue #{number:u64} gains labels "{labels}""#)]
fn issue_gains_labels(
    world: &ReconciliationWorld,
    number: u64,
    labels: String,
) -> Result<(), eyre::Report> {
    let expected = label_list(&labels);
    let mutations = world.tracker.issue_mutations()?;
    eyre::ensure!(
        matches!(
            mutations.as_slice(),
            [TrackerCall::AddLabels { issue, labels: added }]
                if issue.value() == number && *added == expected
        ),
        "expected a single label edit on #{number}, found {mutations:?}"
    );
    Ok(())
}

#[then(r#"issue #{number:u64} still carries label "{label}""#)]
fn issue_keeps_label(
    world: &ReconciliationWorld,
    number: u64,
    label: String,
) -> Result<(), eyre::Report> {
    let issues = world.tracker.issues()?;
    let issue = issues
        .iter()
        .find(|issue| issue.number().value() == number)
        .ok_or_else(|| eyre::eyre!("issue #{number} not found"))?;
    eyre::ensure!(
        issue.labels().contains(&label),
        "issue #{number} lost label {label}"
    );
    Ok(())
}

#[then("no issue is mutated")]
fn no_issue_mutated(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let mutations = world.tracker.issue_mutations()?;
    eyre::ensure!(mutations.is_empty(), "unexpected mutations {mutations:?}");
    Ok(())
}

#[then("no label is created")]
fn no_label_created(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let calls = world.tracker.calls()?;
    eyre::ensure!(
        !calls
            .iter()
            .any(|call| matches!(call, TrackerCall::CreateLabel(_))),
        "labels were created during a dry run"
    );
    Ok(())
}

#[then("the remote issues were listed")]
fn remote_issues_listed(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let calls = world.tracker.calls()?;
    eyre::ensure!(
        calls
            .iter()
            .any(|call| matches!(call, TrackerCall::ListIssues { .. })),
        "remote issues were never listed"
    );
    Ok(())
}

#[then(r#"the summary records {count:usize} "{kind}" decisions"#)]
fn summary_records_decisions(
    world: &ReconciliationWorld,
    count: usize,
    kind: String,
) -> Result<(), eyre::Report> {
    let recorded = world.summary()?.count_decisions(&kind);
    eyre::ensure!(
        recorded == count,
        "expected {count} {kind} decisions, found {recorded}"
    );
    Ok(())
}

#[then(r#"a duplicate identity warning names "{path}""#)]
fn duplicate_identity_warning(world: &ReconciliationWorld, path: String) -> Result<(), eyre::Report> {
    let summary = world.summary()?;
    eyre::ensure!(
        summary.warnings.iter().any(|warning| matches!(
            warning,
            SyncWarning::DuplicateLocalIdentity { path: skipped, .. } if skipped.as_str() == path
        )),
        "no duplicate warning for {path}: {:?}",
        summary.warnings
    );
    Ok(())
}
