//! Primary error enum for mapping, merging, and loading flows.

use std::fmt;

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

use crate::value::ValueKind;

/// The merge operation selected for an existing value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeOperation {
    /// Union an incoming collection into an existing map or set.
    Update,
    /// Push the incoming value onto an existing list.
    Append,
    /// Push every element of an incoming list onto an existing list.
    Extend,
    /// Bind the incoming value, discarding the existing one.
    Replace,
}

impl fmt::Display for MergeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "update",
            Self::Append => "append",
            Self::Extend => "extend",
            Self::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building, merging, or loading mappings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CafeteriaError {
    /// A key was looked up that the mapping does not hold.
    #[error("no entry for key '{key}'")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// A nested lookup was requested without any path segments.
    #[error("no path given")]
    EmptyPath,

    /// The existing value is merge-capable but cannot consume the incoming one.
    #[error("cannot {operation} {existing} at '{key}' with {incoming}")]
    TypeMismatch {
        /// Key whose value was being merged.
        key: String,
        /// Operation chosen from the existing value's capability.
        operation: MergeOperation,
        /// Kind of the value already bound to the key.
        existing: ValueKind,
        /// Kind of the value that was offered.
        incoming: ValueKind,
    },

    /// JSON text could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON source file could not be read.
    #[error("failed to read '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source was neither valid JSON nor the path of an existing file.
    #[error("source is neither JSON nor an existing file: {source_text}")]
    InvalidSource {
        /// The rejected source text.
        source_text: String,
    },

    /// A document parsed successfully but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping {
        /// Kind of the value found at the top level.
        found: ValueKind,
    },

    /// Figment failed to extract a mapping.
    #[error("failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),
}
