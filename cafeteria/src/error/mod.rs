//! Error types produced by merge-aware mappings and their sources.

mod constructors;
mod types;

pub use types::{CafeteriaError, MergeOperation};

/// Result alias used throughout the crate.
pub type CafeteriaResult<T> = Result<T, CafeteriaError>;

#[cfg(test)]
mod tests;
