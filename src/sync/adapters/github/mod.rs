//! GitHub adapter implemented on top of the `gh` command-line client.

mod models;
mod tracker;

pub use tracker::{DEFAULT_GH_PROGRAM, GhCliTracker};
