//! Nested lookups through maps of maps.

use crate::dict::MergingDict;
use crate::error::{CafeteriaError, CafeteriaResult};
use crate::value::MergeValue;

/// Follow `path` through nested mappings and return the value at its end.
///
/// Replaces chains such as "get `a`, then `b`, then `c`" with a single call.
/// Lists are not traversed; a segment that is missing, or an intermediate value
/// that is not a map, yields `Ok(None)`.
///
/// # Examples
///
/// ```
/// use cafeteria::{get_by_path, MergeKind, MergingDict, MergeValue};
/// use serde_json::json;
///
/// let dict = MergingDict::from_json_value(MergeKind::Deep, json!({"a": {"b": {"c": 1}}}))?;
/// assert_eq!(get_by_path(&dict, &["a", "b", "c"])?, Some(&MergeValue::from(1)));
/// assert_eq!(get_by_path(&dict, &["a", "x"])?, None);
/// # Ok::<_, cafeteria::CafeteriaError>(())
/// ```
///
/// # Errors
///
/// Returns [`CafeteriaError::EmptyPath`] when `path` has no segments.
pub fn get_by_path<'a, S: AsRef<str>>(
    dict: &'a MergingDict,
    path: &[S],
) -> CafeteriaResult<Option<&'a MergeValue>> {
    let Some((head, tail)) = path.split_first() else {
        return Err(CafeteriaError::EmptyPath);
    };
    tracing::debug!(head = head.as_ref(), remaining = tail.len(), "resolving path");
    let Some(value) = dict.get(head.as_ref()) else {
        return Ok(None);
    };
    if tail.is_empty() {
        return Ok(Some(value));
    }
    match value {
        MergeValue::Map(inner) => get_by_path(inner, tail),
        _ => Ok(None),
    }
}

/// Like [`get_by_path`], returning `default` when nothing is found.
///
/// # Errors
///
/// Returns [`CafeteriaError::EmptyPath`] when `path` has no segments.
pub fn get_by_path_or<'a, S: AsRef<str>>(
    dict: &'a MergingDict,
    path: &[S],
    default: &'a MergeValue,
) -> CafeteriaResult<&'a MergeValue> {
    Ok(get_by_path(dict, path)?.unwrap_or(default))
}

impl MergingDict {
    /// Method form of [`get_by_path`].
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::EmptyPath`] when `path` has no segments.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> CafeteriaResult<Option<&MergeValue>> {
        get_by_path(self, path)
    }
}
