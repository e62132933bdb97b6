//! Values stored in a [`MergingDict`] and the capabilities that drive merging.
//!
//! Every value belongs to one of three capability classes. Maps and sets are
//! update-capable, lists are append-capable, and everything else is a scalar
//! that is simply replaced on collision. The merge rule always dispatches on
//! the capability of the value already stored, never on the incoming value.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Number, Value as JsonValue};

use crate::dict::{MergeKind, MergingDict};

/// A value held by a [`MergingDict`].
///
/// Equality is structural, except that a `NaN` float equals any other `NaN`
/// so that every value, and every mapping, equals itself.
#[derive(Clone, Debug)]
pub enum MergeValue {
    /// Absence of a value.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer above `i64::MAX`.
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// A single text string. Never fanned out into characters when merged.
    Text(String),
    /// An ordered sequence; append-capable.
    List(Vec<MergeValue>),
    /// A set of text labels; update-capable.
    Set(BTreeSet<String>),
    /// A nested mapping; update-capable.
    Map(MergingDict),
}

/// Names the variant of a [`MergeValue`] for diagnostics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    /// [`MergeValue::Null`].
    Null,
    /// [`MergeValue::Bool`].
    Bool,
    /// [`MergeValue::Integer`].
    Integer,
    /// [`MergeValue::Unsigned`].
    Unsigned,
    /// [`MergeValue::Float`].
    Float,
    /// [`MergeValue::Text`].
    Text,
    /// [`MergeValue::List`].
    List,
    /// [`MergeValue::Set`].
    Set,
    /// [`MergeValue::Map`].
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Unsigned => "unsigned integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// How an existing value absorbs an incoming one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeCapability {
    /// Unions a same-shape collection into itself (maps and sets).
    Update,
    /// Adds elements to its end (lists).
    Append,
    /// Cannot absorb anything; collisions replace it.
    Scalar,
}

impl MergeValue {
    /// Returns the variant name of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Unsigned(_) => ValueKind::Unsigned,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) => ValueKind::List,
            Self::Set(_) => ValueKind::Set,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Classifies the value, checking update-capability before
    /// append-capability.
    #[must_use]
    pub const fn capability(&self) -> MergeCapability {
        match self {
            Self::Map(_) | Self::Set(_) => MergeCapability::Update,
            Self::List(_) => MergeCapability::Append,
            Self::Null
            | Self::Bool(_)
            | Self::Integer(_)
            | Self::Unsigned(_)
            | Self::Float(_)
            | Self::Text(_) => MergeCapability::Scalar,
        }
    }

    /// Builds a [`MergeValue::List`] from anything convertible into values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cafeteria::MergeValue;
    /// let list = MergeValue::list_of([1, 2, 3]);
    /// assert_eq!(list.as_list().map(<[MergeValue]>::len), Some(3));
    /// ```
    #[must_use]
    pub fn list_of<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a [`MergeValue::Set`] from text labels.
    #[must_use]
    pub fn set_of<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(labels.into_iter().map(Into::into).collect())
    }

    /// Converts the value into a list.
    ///
    /// Lists are returned as they are, sets become a list of their labels, and
    /// any other value is wrapped as a single element.
    #[must_use]
    pub fn listify(self) -> Vec<Self> {
        match self {
            Self::List(items) => items,
            Self::Set(labels) => labels.into_iter().map(Self::Text).collect(),
            other => vec![other],
        }
    }

    /// Returns the nested mapping, if this is a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&MergingDict> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the nested mapping mutably, if this is a map.
    pub const fn as_map_mut(&mut self) -> Option<&mut MergingDict> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the labels, if this is a set.
    #[must_use]
    pub const fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(labels) => Some(labels),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` for values that are neither collections nor text.
    #[must_use]
    pub const fn is_bare_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Unsigned(_) | Self::Float(_)
        )
    }

    /// Returns `true` for [`MergeValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts a JSON value, building nested objects as mappings of `kind`.
    ///
    /// Integers above `i64::MAX` are kept as [`MergeValue::Unsigned`].
    #[must_use]
    pub fn from_json(value: JsonValue, kind: MergeKind) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(flag) => Self::Bool(flag),
            JsonValue::Number(number) => number_to_value(&number),
            JsonValue::String(text) => Self::Text(text),
            JsonValue::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| Self::from_json(item, kind))
                    .collect(),
            ),
            JsonValue::Object(map) => Self::Map(MergingDict::from_json_map(kind, map)),
        }
    }

    /// Renders the value as JSON. Sets become arrays and non-finite floats
    /// become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(flag) => JsonValue::Bool(*flag),
            Self::Integer(value) => JsonValue::Number(Number::from(*value)),
            Self::Unsigned(value) => JsonValue::Number(Number::from(*value)),
            Self::Float(value) => Number::from_f64(*value).map_or(JsonValue::Null, JsonValue::Number),
            Self::Text(text) => JsonValue::String(text.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Set(labels) => {
                JsonValue::Array(labels.iter().cloned().map(JsonValue::String).collect())
            }
            Self::Map(map) => map.to_json_value(),
        }
    }
}

fn number_to_value(number: &Number) -> MergeValue {
    if let Some(value) = number.as_i64() {
        MergeValue::Integer(value)
    } else if let Some(value) = number.as_u64() {
        MergeValue::Unsigned(value)
    } else {
        MergeValue::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

impl PartialEq for MergeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Unsigned(a), Self::Unsigned(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for MergeValue {}

impl From<bool> for MergeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MergeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for MergeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for MergeValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for MergeValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Unsigned(value), Self::Integer)
    }
}

impl From<f64> for MergeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MergeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MergeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<MergeValue>> for MergeValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeSet<String>> for MergeValue {
    fn from(value: BTreeSet<String>) -> Self {
        Self::Set(value)
    }
}

impl From<MergingDict> for MergeValue {
    fn from(value: MergingDict) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<MergeValue>> From<Option<T>> for MergeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<MergeValue> for JsonValue {
    fn from(value: MergeValue) -> Self {
        value.to_json()
    }
}

impl Serialize for MergeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Unsigned(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Text(text) => serializer.serialize_str(text),
            Self::List(items) => serializer.collect_seq(items),
            Self::Set(labels) => serializer.collect_seq(labels),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

/// Deserialised objects become [`MergeKind::Deep`] mappings.
impl<'de> Deserialize<'de> for MergeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Ok(Self::from_json(json, MergeKind::Deep))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{MergeCapability, MergeValue, ValueKind};
    use crate::dict::{MergeKind, MergingDict};

    #[rstest]
    #[case(MergeValue::Map(MergingDict::shallow()), MergeCapability::Update)]
    #[case(MergeValue::set_of(["a"]), MergeCapability::Update)]
    #[case(MergeValue::list_of([1]), MergeCapability::Append)]
    #[case(MergeValue::from("text"), MergeCapability::Scalar)]
    #[case(MergeValue::from(0), MergeCapability::Scalar)]
    #[case(MergeValue::Null, MergeCapability::Scalar)]
    fn capability_follows_variant(#[case] value: MergeValue, #[case] expected: MergeCapability) {
        assert_eq!(value.capability(), expected);
    }

    #[rstest]
    #[case(MergeValue::list_of([1, 2]), 2)]
    #[case(MergeValue::set_of(["b", "a"]), 2)]
    #[case(MergeValue::from("solo"), 1)]
    fn listify_wraps_only_non_sequences(#[case] value: MergeValue, #[case] expected_len: usize) {
        assert_eq!(value.listify().len(), expected_len);
    }

    #[rstest]
    fn listify_orders_set_labels() {
        let items = MergeValue::set_of(["b", "a"]).listify();
        assert_eq!(items, vec![MergeValue::from("a"), MergeValue::from("b")]);
    }

    #[rstest]
    fn json_objects_take_the_requested_kind() {
        let value = MergeValue::from_json(json!({"outer": {"inner": 1}}), MergeKind::Deep);
        let outer = value
            .as_map()
            .and_then(|map| map.get("outer"))
            .and_then(MergeValue::as_map)
            .expect("nested map");
        assert_eq!(outer.kind(), MergeKind::Deep);
    }

    #[rstest]
    #[case(json!(u64::MAX), ValueKind::Unsigned)]
    #[case(json!(i64::MAX), ValueKind::Integer)]
    #[case(json!(i64::MIN), ValueKind::Integer)]
    #[case(json!(1.5), ValueKind::Float)]
    fn json_numbers_keep_their_exact_value(#[case] number: serde_json::Value, #[case] kind: ValueKind) {
        let value = MergeValue::from_json(number.clone(), MergeKind::Shallow);
        assert_eq!(value.kind(), kind);
        assert_eq!(value.to_json(), number);
    }

    #[rstest]
    fn small_unsigned_values_are_integers() {
        assert_eq!(MergeValue::from(7_u64), MergeValue::Integer(7));
        assert_eq!(MergeValue::from(u64::MAX), MergeValue::Unsigned(u64::MAX));
    }

    #[rstest]
    fn nan_floats_equal_themselves() {
        let value = MergeValue::Float(f64::NAN);
        assert_eq!(value, value.clone());
        assert_ne!(value, MergeValue::Float(0.0));
        let dict: MergingDict = [("ratio", f64::NAN)].into_iter().collect();
        assert_eq!(dict, dict.clone());
    }

    #[rstest]
    fn sets_render_as_arrays() {
        assert_eq!(MergeValue::set_of(["x", "y"]).to_json(), json!(["x", "y"]));
    }

    #[rstest]
    fn non_finite_floats_render_as_null() {
        assert_eq!(MergeValue::Float(f64::INFINITY).to_json(), json!(null));
    }

    #[rstest]
    fn deserialised_maps_are_deep() {
        let value: MergeValue = serde_json::from_value(json!({"a": {"b": 1}})).expect("valid");
        assert_eq!(value.as_map().map(MergingDict::kind), Some(MergeKind::Deep));
    }
}
