//! Filesystem task repository rooted at a capability-scoped directory.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

use super::front_matter::parse_task_document;
use crate::sync::{
    domain::TaskRecord,
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Task file extension.
const TASK_EXTENSION: &str = "md";

/// Lowercase names of Markdown files that are never task records.
const EXCLUDED_FILE_NAMES: &[&str] = &[
    "readme.md",
    "authors.md",
    "task_breakdown_stage1.md",
    "task_assignments.md",
    "week1_backlog.md",
];

/// Files whose name contains this marker are status reports, not tasks.
const STATUS_REPORT_MARKER: &str = "STATUS";

/// Task repository reading Markdown files beneath a root directory.
///
/// All file access goes through the root [`Dir`] handle, so paths cannot
/// escape the task tree.
#[derive(Debug)]
pub struct FsTaskRepository {
    root: Dir,
}

impl FsTaskRepository {
    /// Opens the task tree at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Scan`] when the directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> TaskRepositoryResult<Self> {
        let root =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(TaskRepositoryError::scan)?;
        Ok(Self { root })
    }

    /// Wraps an already opened directory handle.
    #[must_use]
    pub const fn from_dir(root: Dir) -> Self {
        Self { root }
    }
}

/// Returns whether a file name denotes a task record.
fn is_task_file(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    Utf8Path::new(name).extension() == Some(TASK_EXTENSION)
        && !EXCLUDED_FILE_NAMES.contains(&lowered.as_str())
        && !name.contains(STATUS_REPORT_MARKER)
}

fn collect_task_files(
    dir: &Dir,
    prefix: &Utf8Path,
    found: &mut Vec<Utf8PathBuf>,
) -> io::Result<()> {
    for item in dir.entries()? {
        let entry = item?;
        let name = entry.file_name()?;
        let file_type = entry.file_type()?;
        let relative = prefix.join(&name);
        if file_type.is_dir() {
            let child = entry.open_dir()?;
            collect_task_files(&child, &relative, found)?;
        } else if file_type.is_file() && is_task_file(&name) {
            found.push(relative);
        }
    }
    Ok(())
}

impl TaskRepository for FsTaskRepository {
    fn list(&self) -> TaskRepositoryResult<Vec<Utf8PathBuf>> {
        let mut found = Vec::new();
        collect_task_files(&self.root, Utf8Path::new(""), &mut found)
            .map_err(TaskRepositoryError::scan)?;
        found.sort();
        Ok(found)
    }

    fn parse(&self, path: &Utf8Path) -> TaskRepositoryResult<Option<TaskRecord>> {
        let text = self
            .root
            .read_to_string(path)
            .map_err(|err| TaskRepositoryError::read(path, err))?;
        parse_task_document(path, &text)
    }
}
