//! Filesystem adapter reading task records from Markdown files.

mod front_matter;
mod repository;

pub use repository::FsTaskRepository;
