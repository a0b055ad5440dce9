//! Port contracts for task synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by the reconciler.

pub mod repository;
pub mod tracker;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use tracker::{IssuePage, IssueTracker, IssueTrackerError, IssueTrackerResult, PageRequest};
