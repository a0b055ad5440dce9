//! End-to-end reconciliation over in-memory adapters.

use super::helpers::{Workspace, task_id, workspace};
use rstest::rstest;
use taskbridge::sync::{
    adapters::memory::TrackerCall,
    domain::{IssueState, LabelSet, TaskRecord},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sprint_tasks_are_created_then_left_alone(workspace: Workspace) -> Result<(), eyre::Report> {
    workspace.task(
        TaskRecord::new(task_id("SMK-010")?, "sprints/week1/SMK-010.md")
            .with_title("Login form")
            .with_status("Ready")
            .with_priority("High"),
    )?;
    workspace.task(
        TaskRecord::new(task_id("SMK-011")?, "sprints/week2/SMK-011.md")
            .with_title("Signup form")
            .with_status("Backlog"),
    )?;

    let first = workspace.run(false).await?;
    let created = workspace.issue_mutations()?;
    let second = workspace.run(false).await?;

    eyre::ensure!(first.count_decisions("create") == 2, "expected two creations");
    eyre::ensure!(created.len() == 2, "expected two issue mutations, got {created:?}");
    let Some(TrackerCall::CreateIssue(login)) = created.first() else {
        return Err(eyre::eyre!("first mutation should create SMK-010"));
    };
    eyre::ensure!(login.title() == "SMK-010: Login form", "unexpected title");
    let expected: LabelSet = ["priority:high", "sprint:1", "status:ready"]
        .into_iter()
        .collect();
    eyre::ensure!(login.labels() == &expected, "unexpected labels {}", login.labels());
    eyre::ensure!(
        second.count_decisions("no-op") == 2,
        "second run should find both issues up to date"
    );
    eyre::ensure!(
        workspace.issue_mutations()? == created,
        "second run must not mutate issues"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn label_drift_is_repaired_additively(workspace: Workspace) -> Result<(), eyre::Report> {
    workspace.issue(
        8,
        "SMK-010: Login form",
        IssueState::Open,
        &["status:backlog", "team:web"],
    )?;
    workspace.task(
        TaskRecord::new(task_id("SMK-010")?, "smoke/SMK-010.md")
            .with_status("Ready")
            .with_priority("High"),
    )?;

    let summary = workspace.run(false).await?;

    let expected: LabelSet = ["priority:high", "status:ready"].into_iter().collect();
    let mutations = workspace.issue_mutations()?;
    eyre::ensure!(
        matches!(
            mutations.as_slice(),
            [TrackerCall::AddLabels { labels, .. }] if *labels == expected
        ),
        "expected a single additive edit, got {mutations:?}"
    );
    let issues = workspace.tracker.issues()?;
    let issue = issues
        .first()
        .ok_or_else(|| eyre::eyre!("seeded issue missing"))?;
    eyre::ensure!(
        issue.labels().contains("team:web") && issue.labels().contains("status:backlog"),
        "existing labels must survive"
    );
    eyre::ensure!(summary.succeeded == 1, "expected one success");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dry_run_reports_plan_without_side_effects(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    workspace.issue(1, "PS-001: Roadmap", IssueState::Closed, &[])?;
    workspace.task(TaskRecord::new(task_id("PS-001")?, "planning-system/PS-001.md"))?;
    workspace.task(TaskRecord::new(task_id("PS-002")?, "planning-system/PS-002.md"))?;

    let summary = workspace.run(true).await?;

    let calls = workspace.tracker.calls()?;
    eyre::ensure!(
        calls.iter().all(|call| !call.is_mutation()),
        "dry run issued mutations: {calls:?}"
    );
    eyre::ensure!(
        calls
            .iter()
            .any(|call| matches!(call, TrackerCall::ListIssues { state: IssueState::Closed, .. })),
        "dry run must still list closed issues"
    );
    eyre::ensure!(summary.count_decisions("create") == 1, "expected planned create");
    eyre::ensure!(
        summary.count_decisions("skip-closed") == 1,
        "expected closed issue skip"
    );
    eyre::ensure!(workspace.tracker.labels()?.is_empty(), "labels created in dry run");
    Ok(())
}
