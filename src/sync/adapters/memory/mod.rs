//! In-memory adapters for tests and deterministic local runs.

mod repository;
mod tracker;

pub use repository::InMemoryTaskRepository;
pub use tracker::{InMemoryIssueTracker, TrackerCall};
