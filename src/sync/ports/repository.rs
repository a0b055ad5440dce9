//! Repository port for discovering and parsing local task files.

use crate::sync::domain::TaskRecord;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Source of local task records.
pub trait TaskRepository: Send + Sync {
    /// Lists candidate task files in lexicographic order.
    ///
    /// Paths are relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Scan`] when the task tree cannot be
    /// read.
    fn list(&self) -> TaskRepositoryResult<Vec<Utf8PathBuf>>;

    /// Parses one task file.
    ///
    /// Returns `Ok(None)` when the file declares no task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Read`] when the file cannot be read and
    /// [`TaskRepositoryError::Parse`] when its metadata is malformed.
    fn parse(&self, path: &Utf8Path) -> TaskRepositoryResult<Option<TaskRecord>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task tree could not be traversed.
    #[error("failed to scan task directory: {0}")]
    Scan(Arc<dyn std::error::Error + Send + Sync>),

    /// A task file could not be read.
    #[error("failed to read {path}: {cause}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A task file has malformed metadata.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
}

impl TaskRepositoryError {
    /// Wraps a traversal error.
    pub fn scan(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Scan(Arc::new(err))
    }

    /// Wraps a read error for `path`.
    pub fn read(path: &Utf8Path, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Read {
            path: path.to_owned(),
            cause: Arc::new(err),
        }
    }

    /// Builds a parse error for `path`.
    pub fn parse(path: &Utf8Path, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }
}
