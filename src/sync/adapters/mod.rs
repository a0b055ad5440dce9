//! Adapter implementations for task synchronisation ports.

pub mod fs;
pub mod github;
pub mod memory;
