//! Given steps for reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, label_list};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskbridge::sync::domain::{IssueNumber, IssueState, RemoteIssue, TaskId, TaskRecord};

#[given(
    r#"a task "{task_id}" titled "{title}" with status "{status}" and priority "{priority}" at "{path}""#
)]
fn task_file(
    world: &mut ReconciliationWorld,
    task_id: String,
    title: String,
    status: String,
    priority: String,
    path: String,
) -> Result<(), eyre::Report> {
    let id = task_id
        .parse::<TaskId>()
        .wrap_err("parse task identifier from step")?;
    let record = TaskRecord::new(id, path)
        .with_title(title)
        .with_status(status)
        .with_priority(priority);
    world
        .repository
        .insert(record)
        .wrap_err("store task record")?;
    Ok(())
}

#[given(r#"an open issue #{number:u64} titled "{title}" with labels "{labels}""#)]
fn open_issue(
    world: &mut ReconciliationWorld,
    number: u64,
    title: String,
    labels: String,
) -> Result<(), eyre::Report> {
    seed_issue(world, number, &title, IssueState::Open, &labels)
}

#[given(r#"a closed issue #{number:u64} titled "{title}" with labels "{labels}""#)]
fn closed_issue(
    world: &mut ReconciliationWorld,
    number: u64,
    title: String,
    labels: String,
) -> Result<(), eyre::Report> {
    seed_issue(world, number, &title, IssueState::Closed, &labels)
}

fn seed_issue(
    world: &ReconciliationWorld,
    number: u64,
    title: &str,
    state: IssueState,
    labels: &str,
) -> Result<(), eyre::Report> {
    let issue = RemoteIssue::new(
        IssueNumber::new(number).wrap_err("construct issue number")?,
        title,
        state,
    )
    .with_labels(label_list(labels).iter());
    world
        .tracker
        .insert_issue(issue)
        .wrap_err("seed remote issue")?;
    Ok(())
}
