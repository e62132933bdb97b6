//! Keyed containers whose assignments merge into existing values.
//!
//! A [`MergingDict`] behaves like an ordinary string-keyed map until a key is
//! assigned twice. When the value already stored is merge-capable the new
//! value is folded into it instead of overwriting it: maps and sets absorb
//! incoming collections, lists grow, and scalars are replaced. The
//! [`MergeKind`] decides how far that behaviour reaches:
//!
//! - [`MergeKind::Plain`] never merges; it is the stand-in for an ordinary
//!   mapping nested inside a merging one.
//! - [`MergeKind::Shallow`] merges at its own level only; nested plain maps
//!   absorb incoming maps by overwriting their keys.
//! - [`MergeKind::Deep`] converts every nested plain map into a deep map so
//!   merging recurses to any depth.
//!
//! # Examples
//!
//! ```
//! use cafeteria::{MergeKind, MergingDict};
//! use serde_json::json;
//!
//! let mut settings = MergingDict::from_json_value(
//!     MergeKind::Deep,
//!     json!({"server": {"ports": [80]}}),
//! )?;
//! settings.update(MergingDict::from_json_value(
//!     MergeKind::Plain,
//!     json!({"server": {"ports": [443], "host": "example.org"}}),
//! )?)?;
//! assert_eq!(
//!     settings.to_json_value(),
//!     json!({"server": {"ports": [80, 443], "host": "example.org"}}),
//! );
//! # Ok::<_, cafeteria::CafeteriaError>(())
//! ```

mod merge;

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{CafeteriaError, CafeteriaResult};
use crate::value::MergeValue;

/// Selects how a [`MergingDict`] treats repeated assignment.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MergeKind {
    /// Assignment always overwrites.
    Plain,
    /// Assignment merges into merge-capable values at this level.
    #[default]
    Shallow,
    /// Assignment merges, and nested plain maps are converted to deep maps.
    Deep,
}

impl MergeKind {
    /// Returns `true` when assignment goes through the merge decision.
    #[must_use]
    pub const fn merges(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Kind given to maps nested inside a mapping of this kind when building
    /// from external data.
    pub(crate) const fn nested(self) -> Self {
        match self {
            Self::Deep => Self::Deep,
            Self::Plain | Self::Shallow => Self::Plain,
        }
    }

    /// Prepares `value` for storage in a mapping of this kind.
    ///
    /// Deep mappings convert plain maps; other kinds store values untouched.
    fn adopt(self, value: MergeValue) -> MergeValue {
        match (self, value) {
            (Self::Deep, MergeValue::Map(map)) if map.kind() == Self::Plain => {
                MergeValue::Map(map.into_kind(Self::Deep))
            }
            (_, other) => other,
        }
    }
}

/// A seed folded into a [`MergingDict`] by [`MergingDict::update_with`].
#[derive(Clone, Debug)]
pub enum Seed {
    /// A mapping; every entry goes through the merge decision.
    Map(MergingDict),
    /// Key/value pairs; entries overwrite without merging.
    Pairs(Vec<(String, MergeValue)>),
}

impl From<MergingDict> for Seed {
    fn from(value: MergingDict) -> Self {
        Self::Map(value)
    }
}

impl<K: Into<String>, V: Into<MergeValue>> From<Vec<(K, V)>> for Seed {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A string-keyed map that merges assigned values into existing ones.
///
/// Equality compares entries only; two mappings of different kinds holding the
/// same entries are equal.
#[derive(Clone, Debug, Default)]
pub struct MergingDict {
    kind: MergeKind,
    entries: BTreeMap<String, MergeValue>,
}

impl MergingDict {
    /// Create an empty mapping of `kind`.
    #[must_use]
    pub const fn new(kind: MergeKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Create an empty plain mapping.
    #[must_use]
    pub const fn plain() -> Self {
        Self::new(MergeKind::Plain)
    }

    /// Create an empty shallow merging mapping.
    #[must_use]
    pub const fn shallow() -> Self {
        Self::new(MergeKind::Shallow)
    }

    /// Create an empty deep merging mapping.
    #[must_use]
    pub const fn deep() -> Self {
        Self::new(MergeKind::Deep)
    }

    /// Build a mapping of `kind` from seeds and keyword pairs.
    ///
    /// Each seed is folded in with the [`MergingDict::update_with`] rule, then
    /// every keyword pair goes through [`MergingDict::set`].
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::TypeMismatch`] when a later seed collides with
    /// a merge-capable value it cannot be merged into.
    pub fn from_seeds<S, I, K, V>(kind: MergeKind, seeds: S, kwargs: I) -> CafeteriaResult<Self>
    where
        S: IntoIterator<Item = Seed>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MergeValue>,
    {
        let mut dict = Self::new(kind);
        for seed in seeds {
            dict.update_with(Some(seed), std::iter::empty::<(String, MergeValue)>())?;
        }
        for (key, value) in kwargs {
            dict.set(key, value)?;
        }
        Ok(dict)
    }

    /// Returns the merge kind.
    #[must_use]
    pub const fn kind(&self) -> MergeKind {
        self.kind
    }

    /// Change the merge kind, converting nested plain maps when the new kind
    /// is [`MergeKind::Deep`].
    #[must_use]
    pub fn into_kind(self, kind: MergeKind) -> Self {
        let entries = self
            .entries
            .into_iter()
            .map(|(key, value)| (key, kind.adopt(value)))
            .collect();
        Self { kind, entries }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the mapping holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when `key` is bound.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MergeValue> {
        self.entries.get(key)
    }

    /// Returns the value bound to `key` mutably.
    ///
    /// Values written through this reference bypass the merge decision.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut MergeValue> {
        self.entries.get_mut(key)
    }

    /// Returns the value bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::KeyNotFound`] when `key` is absent.
    pub fn try_get(&self, key: &str) -> CafeteriaResult<&MergeValue> {
        self.entries
            .get(key)
            .ok_or_else(|| CafeteriaError::key_not_found(key))
    }

    /// Iterate over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over values in key order.
    pub fn values(&self) -> impl Iterator<Item = &MergeValue> {
        self.entries.values()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, MergeValue> {
        self.entries.iter()
    }

    /// Unbind `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<MergeValue> {
        self.entries.remove(key)
    }

    /// Bind `key` to `value` unconditionally, bypassing the merge decision.
    ///
    /// Deep mappings convert a plain map `value` before storing it. Returns the
    /// value previously bound to `key`.
    pub fn replace(&mut self, key: impl Into<String>, value: impl Into<MergeValue>) -> Option<MergeValue> {
        let adopted = self.kind.adopt(value.into());
        self.entries.insert(key.into(), adopted)
    }

    /// Assign `value` to `key` through the merge decision.
    ///
    /// Absent keys are bound directly. Present keys merge according to the
    /// capability of the value already stored; see the module documentation.
    /// Plain mappings always overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::TypeMismatch`] when the stored value is
    /// merge-capable but cannot absorb `value`. The stored value is left
    /// unchanged in that case, including every map nested inside it, and the
    /// error names the dotted path from `key` to the failing entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<MergeValue>) -> CafeteriaResult<()> {
        let name: String = key.into();
        let incoming = self.kind.adopt(value.into());
        if !self.kind.merges() {
            self.entries.insert(name, incoming);
            return Ok(());
        }
        match self.entries.get_mut(&name) {
            Some(existing) => {
                let operation = merge::merge_into(&name, existing, incoming)?;
                tracing::trace!(key = %name, %operation, "merged value");
            }
            None => {
                tracing::trace!(key = %name, "bound new key");
                self.entries.insert(name, incoming);
            }
        }
        Ok(())
    }

    /// Fold `other` into this mapping.
    ///
    /// Merging mappings assign every entry of `other` through
    /// [`MergingDict::set`]; plain mappings overwrite per key. A deep mapping
    /// first converts a plain `other` to a deep one so nested values recurse.
    ///
    /// # Errors
    ///
    /// Propagates the first [`CafeteriaError::TypeMismatch`]; entries applied
    /// before it remain applied.
    pub fn update(&mut self, other: Self) -> CafeteriaResult<()> {
        let incoming = if self.kind == MergeKind::Deep && other.kind == MergeKind::Plain {
            other.into_kind(MergeKind::Deep)
        } else {
            other
        };
        for (key, value) in incoming.entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Overwrite entries from key/value pairs without merging.
    pub fn update_pairs<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MergeValue>,
    {
        for (key, value) in pairs {
            self.replace(key, value);
        }
    }

    /// Fold an optional seed and then keyword pairs into this mapping.
    ///
    /// A [`Seed::Map`] goes through [`MergingDict::update`], a
    /// [`Seed::Pairs`] through [`MergingDict::update_pairs`], and `None` is a
    /// no-op. Keyword pairs are then assigned through [`MergingDict::set`].
    ///
    /// # Errors
    ///
    /// Propagates [`CafeteriaError::TypeMismatch`] from the merge decision.
    pub fn update_with<I, K, V>(&mut self, other: Option<Seed>, kwargs: I) -> CafeteriaResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MergeValue>,
    {
        match other {
            Some(Seed::Map(map)) => self.update(map)?,
            Some(Seed::Pairs(pairs)) => self.update_pairs(pairs),
            None => {}
        }
        for (key, value) in kwargs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl PartialEq for MergingDict {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for MergingDict {}

/// Collected entries bind with [`MergingDict::replace`]; the last duplicate
/// wins. The result is a shallow merging mapping.
impl<K: Into<String>, V: Into<MergeValue>> FromIterator<(K, V)> for MergingDict {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Self::shallow();
        dict.update_pairs(iter);
        dict
    }
}

impl<K: Into<String>, V: Into<MergeValue>> Extend<(K, V)> for MergingDict {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.update_pairs(iter);
    }
}

impl IntoIterator for MergingDict {
    type Item = (String, MergeValue);
    type IntoIter = btree_map::IntoIter<String, MergeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a MergingDict {
    type Item = (&'a String, &'a MergeValue);
    type IntoIter = btree_map::Iter<'a, String, MergeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for MergingDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}

/// Deserialised mappings are [`MergeKind::Deep`].
impl<'de> Deserialize<'de> for MergingDict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(Self::from_json_map(MergeKind::Deep, map))
    }
}

#[cfg(test)]
mod tests;
