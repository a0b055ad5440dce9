//! Synchronises Markdown task files with GitHub issues.
//!
//! Usage:
//!
//! ```text
//! taskbridge --repo owner/repo [--tasks-dir tasks] [--dry-run]
//! ```
//!
//! Every task file under the task directory whose front matter carries a
//! `task_id` is matched against the repository's issues. Missing issues are
//! created, open issues gain the labels derived from the task, and closed
//! issues are left untouched. The run summary is printed to standard output;
//! logs go to standard error and honour `RUST_LOG`.
//!
//! Exit status is `0` for a clean run, `1` when any task file failed and `2`
//! when the run could not start or the remote state could not be fetched.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use taskbridge::sync::{
    adapters::{
        fs::FsTaskRepository,
        github::{DEFAULT_GH_PROGRAM, GhCliTracker},
    },
    domain::{PageSize, RepositoryFullName},
    ports::TaskRepositoryError,
    services::{
        BodyLinks, DEFAULT_LINK_ROOT, DEFAULT_SPRINT_LINK, Reconciler, ReconcilerConfig, SyncError,
        SyncSummary,
    },
};
use thiserror::Error;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_RECORD_FAILURES: u8 = 1;
const EXIT_FATAL: u8 = 2;

/// Log output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Synchronise Markdown task files with GitHub issues.
#[derive(Debug, Parser)]
#[command(name = "taskbridge", version, about)]
struct Cli {
    /// Log the mutations a run would perform without performing them.
    #[arg(long)]
    dry_run: bool,

    /// Target repository in `owner/repo` form.
    #[arg(long, env = "TASKBRIDGE_REPO")]
    repo: RepositoryFullName,

    /// Directory scanned for task files.
    #[arg(long, env = "TASKBRIDGE_TASKS_DIR", default_value = "tasks")]
    tasks_dir: Utf8PathBuf,

    /// Issues requested per listing call (1-100).
    #[arg(long, default_value_t = PageSize::default())]
    page_size: PageSize,

    /// GitHub CLI executable.
    #[arg(long = "gh", env = "TASKBRIDGE_GH", default_value = DEFAULT_GH_PROGRAM)]
    gh_program: String,

    /// Prefix of the task file link rendered into new issue bodies.
    #[arg(long, default_value = DEFAULT_LINK_ROOT)]
    link_root: String,

    /// Link to the current sprint document; pass an empty value to omit it.
    #[arg(long, default_value = DEFAULT_SPRINT_LINK)]
    sprint_link: String,

    /// Log output encoding.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    fn reconciler_config(&self) -> ReconcilerConfig {
        let links = BodyLinks::new(self.link_root.clone()).with_sprint_link(self.sprint_link.clone());
        ReconcilerConfig::new()
            .with_dry_run(self.dry_run)
            .with_page_size(self.page_size)
            .with_links(links)
    }
}

/// Errors that abort the command before a summary is produced.
#[derive(Debug, Error)]
enum CliError {
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to open task directory {path}: {source}")]
    TasksDir {
        path: Utf8PathBuf,
        source: TaskRepositoryError,
    },
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("failed to write run summary: {0}")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(summary) if summary.has_failures() => ExitCode::from(EXIT_RECORD_FAILURES),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "synchronisation aborted");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(io::stderr)).init(),
    }
}

fn run(cli: &Cli) -> Result<SyncSummary, CliError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    let summary = runtime.block_on(synchronise(cli))?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{summary}").map_err(CliError::Output)?;
    stdout.flush().map_err(CliError::Output)?;
    Ok(summary)
}

async fn synchronise(cli: &Cli) -> Result<SyncSummary, CliError> {
    let repository =
        FsTaskRepository::open(&cli.tasks_dir).map_err(|source| CliError::TasksDir {
            path: cli.tasks_dir.clone(),
            source,
        })?;
    let tracker = GhCliTracker::new(cli.repo.clone()).with_program(cli.gh_program.clone());
    let reconciler = Reconciler::new(Arc::new(tracker), cli.reconciler_config());

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));
    let result = reconciler.run(&repository, &cancel).await;
    interrupt.abort();
    Ok(result?)
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupt received; stopping after the current task file");
        cancel.cancel();
    }
}
