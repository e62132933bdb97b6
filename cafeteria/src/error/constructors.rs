//! Convenience constructors for `CafeteriaError`.

use camino::Utf8Path;
use figment::Error as FigmentError;

use super::{CafeteriaError, MergeOperation};
use crate::value::ValueKind;

impl CafeteriaError {
    /// Construct a [`CafeteriaError::KeyNotFound`] for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cafeteria::CafeteriaError;
    /// let err = CafeteriaError::key_not_found("port");
    /// assert_eq!(err.to_string(), "no entry for key 'port'");
    /// ```
    #[must_use]
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Construct a [`CafeteriaError::TypeMismatch`].
    #[must_use]
    pub fn type_mismatch(
        key: impl Into<String>,
        operation: MergeOperation,
        existing: ValueKind,
        incoming: ValueKind,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            operation,
            existing,
            incoming,
        }
    }

    /// Construct a [`CafeteriaError::File`] for a failed read of `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_owned(),
            source,
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cafeteria::CafeteriaError;
    /// let fe = figment::Error::from("boom");
    /// let e = CafeteriaError::gathering(fe);
    /// assert!(matches!(e, CafeteriaError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Prefix the key of a [`CafeteriaError::TypeMismatch`] with `parent`,
    /// producing a dotted path. Other errors pass through unchanged.
    #[must_use]
    pub(crate) fn nested_under(self, parent: &str) -> Self {
        match self {
            Self::TypeMismatch {
                key,
                operation,
                existing,
                incoming,
            } => Self::TypeMismatch {
                key: format!("{parent}.{key}"),
                operation,
                existing,
                incoming,
            },
            other => other,
        }
    }

    /// Returns `true` when the error reports a missing key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}
