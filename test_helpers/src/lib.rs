//! Test helpers shared across crates in the workspace.
//!
//! Provides environment variable guards, a `figment::Jail` wrapper, and JSON
//! fixture files on disk.

pub mod env;
pub mod figment;
pub mod json;
