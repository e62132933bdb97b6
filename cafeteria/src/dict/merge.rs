//! The per-key merge decision.

use std::collections::BTreeSet;

use crate::error::{CafeteriaError, CafeteriaResult, MergeOperation};
use crate::value::{MergeCapability, MergeValue};

use super::MergingDict;

/// Fold `incoming` into `existing`, returning the operation that was applied.
///
/// Only the capability of `existing` selects the operation. A bare scalar
/// offered to an update-capable value is a change of type and replaces it. When
/// the chosen operation cannot consume a collection or text `incoming`,
/// `existing` is left untouched and a [`CafeteriaError::TypeMismatch`] is
/// returned.
pub(super) fn merge_into(
    key: &str,
    existing: &mut MergeValue,
    incoming: MergeValue,
) -> CafeteriaResult<MergeOperation> {
    match existing.capability() {
        MergeCapability::Update => update_into(key, existing, incoming),
        MergeCapability::Append => Ok(append_into(existing, incoming)),
        MergeCapability::Scalar => {
            *existing = incoming;
            Ok(MergeOperation::Replace)
        }
    }
}

fn update_into(
    key: &str,
    existing: &mut MergeValue,
    incoming: MergeValue,
) -> CafeteriaResult<MergeOperation> {
    if incoming.is_bare_scalar() {
        *existing = incoming;
        return Ok(MergeOperation::Replace);
    }
    let existing_kind = existing.kind();
    let offered_kind = incoming.kind();
    let mismatch = || {
        CafeteriaError::type_mismatch(key, MergeOperation::Update, existing_kind, offered_kind)
    };
    // A lone string is one element, never a sequence of characters.
    let normalised = match incoming {
        MergeValue::Text(text) => MergeValue::List(vec![MergeValue::Text(text)]),
        other => other,
    };
    match existing {
        MergeValue::Map(map) => update_map(key, map, normalised, mismatch)?,
        MergeValue::Set(labels) => update_set(labels, normalised, mismatch)?,
        _ => return Err(mismatch()),
    }
    Ok(MergeOperation::Update)
}

fn update_map<F>(
    key: &str,
    map: &mut MergingDict,
    incoming: MergeValue,
    mismatch: F,
) -> CafeteriaResult<()>
where
    F: Fn() -> CafeteriaError,
{
    match incoming {
        MergeValue::Map(other) => {
            // Nested entries apply one by one, so stage them and commit whole.
            let mut staged = map.clone();
            staged
                .update(other)
                .map_err(|err| err.nested_under(key))?;
            *map = staged;
            Ok(())
        }
        MergeValue::List(items) => {
            let pairs = into_pairs(items).ok_or_else(&mismatch)?;
            map.update_pairs(pairs);
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

/// Interpret `items` as `[key, value]` pairs. Returns `None` unless every
/// element is a two-element list with a text key.
fn into_pairs(items: Vec<MergeValue>) -> Option<Vec<(String, MergeValue)>> {
    items
        .into_iter()
        .map(|item| match item {
            MergeValue::List(pair) if pair.len() == 2 => {
                let mut parts = pair.into_iter();
                match (parts.next(), parts.next()) {
                    (Some(MergeValue::Text(name)), Some(value)) => Some((name, value)),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

fn update_set<F>(
    labels: &mut BTreeSet<String>,
    incoming: MergeValue,
    mismatch: F,
) -> CafeteriaResult<()>
where
    F: Fn() -> CafeteriaError,
{
    match incoming {
        MergeValue::Set(other) => labels.extend(other),
        MergeValue::Map(other) => labels.extend(other.keys().map(str::to_owned)),
        MergeValue::List(items) => {
            if !items.iter().all(|item| matches!(item, MergeValue::Text(_))) {
                return Err(mismatch());
            }
            labels.extend(items.into_iter().filter_map(|item| match item {
                MergeValue::Text(text) => Some(text),
                _ => None,
            }));
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn append_into(existing: &mut MergeValue, incoming: MergeValue) -> MergeOperation {
    let MergeValue::List(items) = existing else {
        *existing = incoming;
        return MergeOperation::Replace;
    };
    match incoming {
        MergeValue::List(more) => {
            items.extend(more);
            MergeOperation::Extend
        }
        other => {
            items.push(other);
            MergeOperation::Append
        }
    }
}
