//! Synchronisation of Markdown task files with tracker issues.
//!
//! Each run provisions the label vocabulary, snapshots every remote issue
//! into an index keyed by the task identifier embedded in its title, then
//! walks the task directory and applies the minimal additive mutation per
//! record. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
