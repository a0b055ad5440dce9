//! Taskbridge: one-way synchronisation of Markdown task files to GitHub
//! issues.
//!
//! Task files carry YAML front matter with a `task_id` such as `SMK-010`.
//! Taskbridge creates a tracker issue for every task that has none, adds the
//! labels derived from the task's status, priority and location, and leaves
//! closed issues untouched.
//!
//! # Architecture
//!
//! Taskbridge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, `gh`, memory)
//!
//! # Modules
//!
//! - [`sync`]: Task identity, label derivation and reconciliation
//! - [`command_line`]: Shell rendering of subprocess invocations for logs

pub mod command_line;
pub mod sync;
