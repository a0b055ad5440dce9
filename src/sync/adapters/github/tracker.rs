//! Issue tracker adapter driving the GitHub CLI.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::models::IssuePayload;
use crate::command_line::render_command;
use crate::sync::{
    domain::{IssueDraft, IssueNumber, IssueState, LabelSet, RepositoryFullName},
    ports::{IssuePage, IssueTracker, IssueTrackerError, IssueTrackerResult, PageRequest},
};

/// Default GitHub CLI executable.
pub const DEFAULT_GH_PROGRAM: &str = "gh";

/// Issue tracker backed by `gh` subprocess calls.
///
/// Listing uses `gh api` so results can be paged; mutations use the
/// `issue` and `label` subcommands.
#[derive(Debug, Clone)]
pub struct GhCliTracker {
    program: String,
    repository: RepositoryFullName,
}

impl GhCliTracker {
    /// Creates a tracker for `repository` using the `gh` found on `PATH`.
    #[must_use]
    pub fn new(repository: RepositoryFullName) -> Self {
        Self {
            program: DEFAULT_GH_PROGRAM.to_owned(),
            repository,
        }
    }

    /// Overrides the CLI executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns the target repository.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryFullName {
        &self.repository
    }

    pub(super) fn list_args(&self, state: IssueState, page: PageRequest) -> Vec<String> {
        vec![
            "api".to_owned(),
            "--method".to_owned(),
            "GET".to_owned(),
            format!("repos/{}/issues", self.repository),
            "-f".to_owned(),
            format!("state={state}"),
            "-f".to_owned(),
            format!("per_page={}", page.size()),
            "-f".to_owned(),
            format!("page={}", page.page()),
        ]
    }

    pub(super) fn create_args(&self, draft: &IssueDraft) -> Vec<String> {
        let mut args = vec![
            "issue".to_owned(),
            "create".to_owned(),
            "--repo".to_owned(),
            self.repository.to_string(),
            "--title".to_owned(),
            draft.title().to_owned(),
            "--body".to_owned(),
            draft.body().to_owned(),
        ];
        if !draft.labels().is_empty() {
            args.push("--label".to_owned());
            args.push(draft.labels().joined());
        }
        args
    }

    pub(super) fn add_labels_args(&self, issue: IssueNumber, labels: &LabelSet) -> Vec<String> {
        vec![
            "issue".to_owned(),
            "edit".to_owned(),
            issue.value().to_string(),
            "--repo".to_owned(),
            self.repository.to_string(),
            "--add-label".to_owned(),
            labels.joined(),
        ]
    }

    pub(super) fn create_label_args(&self, name: &str) -> Vec<String> {
        vec![
            "label".to_owned(),
            "create".to_owned(),
            name.to_owned(),
            "--repo".to_owned(),
            self.repository.to_string(),
            "--force".to_owned(),
        ]
    }

    async fn run(&self, args: &[String]) -> IssueTrackerResult<String> {
        let command = render_command(&self.program, args);
        debug!(%command, "invoking tracker CLI");

        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(IssueTrackerError::transport)?;
        if !output.status.success() {
            return Err(IssueTrackerError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        String::from_utf8(output.stdout)
            .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))
    }
}

/// Decodes one page of the issues endpoint.
///
/// Pull requests share the endpoint and are dropped; `has_more` reflects the
/// raw entry count so a page full of pull requests still advances paging.
pub(super) fn parse_issue_page(stdout: &str, page: PageRequest) -> IssueTrackerResult<IssuePage> {
    let payloads: Vec<IssuePayload> = serde_json::from_str(stdout)
        .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))?;
    let ceiling = usize::try_from(page.size().get())
        .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))?;
    let has_more = payloads.len() >= ceiling;
    let issues = payloads
        .into_iter()
        .filter(|payload| !payload.is_pull_request())
        .map(|payload| {
            payload
                .into_remote_issue()
                .map_err(|err| IssueTrackerError::InvalidResponse(err.to_string()))
        })
        .collect::<IssueTrackerResult<Vec<_>>>()?;
    Ok(IssuePage { issues, has_more })
}

/// Extracts the issue number from the URL printed by `gh issue create`.
pub(super) fn parse_created_issue(stdout: &str) -> IssueTrackerResult<IssueNumber> {
    let url = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or_default();
    url.rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u64>().ok())
        .and_then(|value| IssueNumber::new(value).ok())
        .ok_or_else(|| {
            IssueTrackerError::InvalidResponse(format!(
                "could not parse issue number from gh output: {url}"
            ))
        })
}

#[async_trait]
impl IssueTracker for GhCliTracker {
    async fn list_issues(
        &self,
        state: IssueState,
        page: PageRequest,
    ) -> IssueTrackerResult<IssuePage> {
        let stdout = self.run(&self.list_args(state, page)).await?;
        parse_issue_page(&stdout, page)
    }

    async fn create_issue(&self, draft: &IssueDraft) -> IssueTrackerResult<IssueNumber> {
        let stdout = self.run(&self.create_args(draft)).await?;
        parse_created_issue(&stdout)
    }

    async fn add_labels(&self, issue: IssueNumber, labels: &LabelSet) -> IssueTrackerResult<()> {
        if labels.is_empty() {
            return Ok(());
        }
        self.run(&self.add_labels_args(issue, labels)).await?;
        Ok(())
    }

    async fn create_label(&self, name: &str) -> IssueTrackerResult<()> {
        self.run(&self.create_label_args(name)).await?;
        Ok(())
    }
}
