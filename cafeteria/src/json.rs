//! JSON sources and renderings for merge-aware mappings.
//!
//! Mappings can be built from JSON text, from a JSON file, or from a source
//! string that is either of the two. Objects nested inside the document become
//! plain mappings, except under [`MergeKind::Deep`] where they become deep
//! mappings themselves.

use std::fmt;

use camino::Utf8Path;
use serde_json::{Map, Value as JsonValue};

use crate::dict::{MergeKind, MergingDict};
use crate::error::{CafeteriaError, CafeteriaResult};
use crate::value::MergeValue;

impl MergingDict {
    /// Build a mapping of `kind` from a JSON object.
    #[must_use]
    pub fn from_json_map(kind: MergeKind, map: Map<String, JsonValue>) -> Self {
        let nested = kind.nested();
        let mut dict = Self::new(kind);
        for (key, value) in map {
            dict.replace(key, MergeValue::from_json(value, nested));
        }
        dict
    }

    /// Build a mapping of `kind` from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::NotAMapping`] when `value` is not an object.
    pub fn from_json_value(kind: MergeKind, value: JsonValue) -> CafeteriaResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self::from_json_map(kind, map)),
            other => Err(CafeteriaError::NotAMapping {
                found: MergeValue::from_json(other, kind).kind(),
            }),
        }
    }

    /// Parse JSON text into a mapping of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::Json`] for malformed text and
    /// [`CafeteriaError::NotAMapping`] when the document is not an object.
    pub fn from_json_str(kind: MergeKind, text: &str) -> CafeteriaResult<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_json_value(kind, value)
    }

    /// Read and parse a JSON file into a mapping of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::File`] when the file cannot be read, otherwise
    /// the errors of [`MergingDict::from_json_str`].
    pub fn from_json_file(kind: MergeKind, path: &Utf8Path) -> CafeteriaResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| CafeteriaError::file(path, err))?;
        tracing::debug!(path = %path, "loaded JSON mapping");
        Self::from_json_str(kind, &text)
    }

    /// Load a mapping from `source`, which is either JSON text or the path of
    /// a JSON file.
    ///
    /// The text interpretation wins; the file is consulted only when `source`
    /// does not parse as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use cafeteria::{MergeKind, MergingDict};
    ///
    /// let dict = MergingDict::load_json(MergeKind::Shallow, r#"{"name": "demo"}"#)?;
    /// assert_eq!(dict.get("name").and_then(|v| v.as_text()), Some("demo"));
    /// # Ok::<_, cafeteria::CafeteriaError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::InvalidSource`] when `source` is neither valid
    /// JSON nor an existing file, or the errors of
    /// [`MergingDict::from_json_file`] when the file cannot be loaded.
    pub fn load_json(kind: MergeKind, source: &str) -> CafeteriaResult<Self> {
        match serde_json::from_str::<JsonValue>(source) {
            Ok(value) => Self::from_json_value(kind, value),
            Err(parse_err) => {
                let path = Utf8Path::new(source);
                if path.is_file() {
                    Self::from_json_file(kind, path)
                } else {
                    tracing::debug!(error = %parse_err, "source is neither JSON nor a file");
                    Err(CafeteriaError::InvalidSource {
                        source_text: source.to_owned(),
                    })
                }
            }
        }
    }

    /// Render the mapping as a JSON object.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        JsonValue::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Render the mapping as indented JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::Json`] if serialisation fails.
    pub fn to_json_pretty(&self) -> CafeteriaResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value())?)
    }
}

impl fmt::Display for MergingDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = self.to_json_pretty().map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

impl From<MergingDict> for JsonValue {
    fn from(value: MergingDict) -> Self {
        value.to_json_value()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::dict::{MergeKind, MergingDict};
    use crate::error::CafeteriaError;
    use crate::value::{MergeValue, ValueKind};

    #[rstest]
    #[case(MergeKind::Plain, MergeKind::Plain)]
    #[case(MergeKind::Shallow, MergeKind::Plain)]
    #[case(MergeKind::Deep, MergeKind::Deep)]
    fn nested_objects_follow_the_parent_kind(#[case] kind: MergeKind, #[case] expected: MergeKind) {
        let dict = MergingDict::from_json_str(kind, r#"{"inner": {"x": 1}}"#).expect("valid");
        let inner = dict.get("inner").and_then(MergeValue::as_map).expect("map");
        assert_eq!(dict.kind(), kind);
        assert_eq!(inner.kind(), expected);
    }

    #[rstest]
    #[case("[1, 2]", ValueKind::List)]
    #[case("\"text\"", ValueKind::Text)]
    #[case("3", ValueKind::Integer)]
    fn top_level_must_be_an_object(#[case] text: &str, #[case] expected: ValueKind) {
        let err = MergingDict::from_json_str(MergeKind::Shallow, text).expect_err("not an object");
        assert!(
            matches!(err, CafeteriaError::NotAMapping { found } if found == expected),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn malformed_text_is_a_json_error() {
        let err = MergingDict::from_json_str(MergeKind::Shallow, "{").expect_err("malformed");
        assert!(matches!(err, CafeteriaError::Json(_)));
    }

    #[rstest]
    fn unknown_sources_are_rejected() {
        let err = MergingDict::load_json(MergeKind::Shallow, "definitely/not/a/file.json")
            .expect_err("neither JSON nor a file");
        assert!(matches!(err, CafeteriaError::InvalidSource { .. }));
    }

    #[rstest]
    fn display_renders_pretty_json() {
        let dict = MergingDict::from_json_value(MergeKind::Shallow, json!({"a": [1]}))
            .expect("object");
        assert_eq!(dict.to_string(), "{\n  \"a\": [\n    1\n  ]\n}");
    }
}
