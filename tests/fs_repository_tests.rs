//! Filesystem task repository integration tests.

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use taskbridge::sync::{
    adapters::{
        fs::FsTaskRepository,
        memory::{InMemoryIssueTracker, TrackerCall},
    },
    domain::LabelSet,
    ports::{TaskRepository, TaskRepositoryError},
    services::{Reconciler, ReconcilerConfig, RecordError},
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const LOGIN_TASK: &str = "---
task_id: SMK-010
title: Login form
status: Ready
priority: High
estimate: 3
assignee: dana
---

Build the login form.
";

const PLANNING_TASK: &str = "---
task_id: PS-001
title: Roadmap
status: In Progress
priority: Critical
---
";

const UNTRACKED_NOTE: &str = "# Ideas\n\nNothing to track here.\n";

const BROKEN_TASK: &str = "---
task_id: SMK-011
title: Never closed
";

/// Temporary task tree kept alive for the duration of a test.
struct TaskTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl TaskTree {
    fn write(&self, relative: &str, contents: &str) -> Result<(), eyre::Report> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn repository(&self) -> Result<FsTaskRepository, eyre::Report> {
        Ok(FsTaskRepository::open(&self.root)?)
    }
}

#[fixture]
fn tree() -> TaskTree {
    let dir = tempfile::tempdir().expect("create temporary task tree");
    let root = Utf8Path::from_path(dir.path())
        .expect("temporary directory path is UTF-8")
        .to_owned();
    let tree = TaskTree { _dir: dir, root };
    for (relative, contents) in [
        ("sprints/week1/SMK-010-login.md", LOGIN_TASK),
        ("planning-system/PS-001.md", PLANNING_TASK),
        ("notes/ideas.md", UNTRACKED_NOTE),
        ("broken.md", BROKEN_TASK),
        ("README.md", "# Tasks\n"),
        ("SPRINT_STATUS.md", "---\ntask_id: SMK-099\n---\n"),
        ("sprints/week1/notes.txt", "not markdown"),
    ] {
        tree.write(relative, contents).expect("write task file");
    }
    tree
}

#[rstest]
fn listing_skips_excluded_files_and_sorts(tree: TaskTree) -> Result<(), eyre::Report> {
    let paths = tree.repository()?.list()?;

    let expected: Vec<Utf8PathBuf> = [
        "broken.md",
        "notes/ideas.md",
        "planning-system/PS-001.md",
        "sprints/week1/SMK-010-login.md",
    ]
    .into_iter()
    .map(Utf8PathBuf::from)
    .collect();
    eyre::ensure!(paths == expected, "unexpected listing {paths:?}");
    Ok(())
}

#[rstest]
fn parsing_reads_front_matter_and_body(tree: TaskTree) -> Result<(), eyre::Report> {
    let repository = tree.repository()?;

    let record = repository
        .parse(Utf8Path::new("sprints/week1/SMK-010-login.md"))?
        .ok_or_else(|| eyre::eyre!("login task should carry an identity"))?;

    eyre::ensure!(record.task_id().encode() == "SMK-010", "wrong identifier");
    eyre::ensure!(record.title() == "Login form", "wrong title");
    eyre::ensure!(record.estimate() == Some(3.0), "wrong estimate");
    eyre::ensure!(record.assignee() == Some("dana"), "wrong assignee");
    eyre::ensure!(record.content() == "Build the login form.", "wrong body");
    eyre::ensure!(
        record.source_path() == "sprints/week1/SMK-010-login.md",
        "source path must stay relative to the task root"
    );
    Ok(())
}

#[rstest]
fn files_without_identity_and_broken_files_are_distinguished(
    tree: TaskTree,
) -> Result<(), eyre::Report> {
    let repository = tree.repository()?;

    let untracked = repository.parse(Utf8Path::new("notes/ideas.md"))?;
    let broken = repository.parse(Utf8Path::new("broken.md"));

    eyre::ensure!(untracked.is_none(), "note should have no identity");
    eyre::ensure!(
        matches!(broken, Err(TaskRepositoryError::Parse { .. })),
        "unterminated front matter should fail to parse, got {broken:?}"
    );
    Ok(())
}

#[rstest]
fn opening_a_missing_directory_fails(tree: TaskTree) {
    let result = FsTaskRepository::open(&tree.root.join("missing"));
    assert!(matches!(result, Err(TaskRepositoryError::Scan(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_tree_reconciles_against_tracker(tree: TaskTree) -> Result<(), eyre::Report> {
    let tracker = InMemoryIssueTracker::new();
    let reconciler = Reconciler::new(Arc::new(tracker.clone()), ReconcilerConfig::new());

    let summary = reconciler
        .run(&tree.repository()?, &CancellationToken::new())
        .await?;

    eyre::ensure!(summary.processed == 4, "expected four task files");
    eyre::ensure!(summary.skipped == 1, "note should be skipped");
    eyre::ensure!(
        matches!(
            summary.failures.as_slice(),
            [failure] if matches!(failure.error, RecordError::Parse(_))
        ),
        "broken file should be the only failure"
    );
    let created: Vec<(String, LabelSet)> = tracker
        .issue_mutations()?
        .into_iter()
        .filter_map(|call| match call {
            TrackerCall::CreateIssue(draft) => {
                Some((draft.title().to_owned(), draft.labels().clone()))
            }
            _ => None,
        })
        .collect();
    let expected = vec![
        (
            "PS-001: Roadmap".to_owned(),
            ["component:planning", "priority:critical", "status:in-progress"]
                .into_iter()
                .collect::<LabelSet>(),
        ),
        (
            "SMK-010: Login form".to_owned(),
            ["priority:high", "sprint:1", "status:ready"]
                .into_iter()
                .collect::<LabelSet>(),
        ),
    ];
    eyre::ensure!(created == expected, "unexpected creations {created:?}");
    Ok(())
}
