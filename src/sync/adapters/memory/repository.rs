//! In-memory task repository for reconciliation tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::TaskRecord,
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Entries are listed in lexicographic path order, like the filesystem
/// adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryRepositoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRepositoryState {
    entries: BTreeMap<Utf8PathBuf, StoredEntry>,
    scan_failure: Option<String>,
}

#[derive(Debug, Clone)]
enum StoredEntry {
    Record(TaskRecord),
    WithoutIdentity,
    Malformed(String),
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::scan(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a parsed record under its source path.
    ///
    /// A record stored under an existing path replaces it.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lock acquisition fails.
    pub fn insert(&self, record: TaskRecord) -> TaskRepositoryResult<()> {
        let path = record.source_path().to_owned();
        self.insert_entry(path, StoredEntry::Record(record))
    }

    /// Stores a file whose metadata carries no task identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lock acquisition fails.
    pub fn insert_without_identity(&self, path: impl Into<Utf8PathBuf>) -> TaskRepositoryResult<()> {
        self.insert_entry(path.into(), StoredEntry::WithoutIdentity)
    }

    /// Stores a file that fails to parse with `reason`.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lock acquisition fails.
    pub fn insert_malformed(
        &self,
        path: impl Into<Utf8PathBuf>,
        reason: impl Into<String>,
    ) -> TaskRepositoryResult<()> {
        self.insert_entry(path.into(), StoredEntry::Malformed(reason.into()))
    }

    /// Makes every subsequent listing fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lock acquisition fails.
    pub fn fail_scan(&self, reason: impl Into<String>) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.scan_failure = Some(reason.into());
        Ok(())
    }

    fn insert_entry(&self, path: Utf8PathBuf, entry: StoredEntry) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.entries.insert(path, entry);
        Ok(())
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn list(&self) -> TaskRepositoryResult<Vec<Utf8PathBuf>> {
        let state = self.state.read().map_err(lock_error)?;
        if let Some(reason) = &state.scan_failure {
            return Err(TaskRepositoryError::scan(std::io::Error::other(
                reason.clone(),
            )));
        }
        Ok(state.entries.keys().cloned().collect())
    }

    fn parse(&self, path: &Utf8Path) -> TaskRepositoryResult<Option<TaskRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        match state.entries.get(path) {
            Some(StoredEntry::Record(record)) => Ok(Some(record.clone())),
            Some(StoredEntry::WithoutIdentity) => Ok(None),
            Some(StoredEntry::Malformed(reason)) => {
                Err(TaskRepositoryError::parse(path, reason.clone()))
            }
            None => Err(TaskRepositoryError::read(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such task file"),
            )),
        }
    }
}
