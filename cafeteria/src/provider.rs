//! Figment integration for merge-aware mappings.
//!
//! A [`MergingDict`] is a figment [`Provider`], so it can be layered with file
//! and environment providers, and a finished [`Figment`] can be extracted back
//! into a mapping.

use figment::providers::Serialized;
use figment::value::{Dict, Map};
use figment::{Error, Figment, Metadata, Profile, Provider};
use serde_json::Value as JsonValue;

use crate::dict::{MergeKind, MergingDict};
use crate::error::{CafeteriaError, CafeteriaResult};

impl Provider for MergingDict {
    fn metadata(&self) -> Metadata {
        Metadata::named("merging dict")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Serialized::defaults(self).data()
    }
}

impl MergingDict {
    /// Extract the merged contents of `figment` as a mapping of `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cafeteria::{MergeKind, MergingDict};
    /// use figment::Figment;
    /// use serde_json::json;
    ///
    /// let defaults = MergingDict::from_json_value(MergeKind::Plain, json!({"port": 80}))?;
    /// let figment = Figment::from(defaults);
    /// let dict = MergingDict::from_figment(MergeKind::Deep, &figment)?;
    /// assert_eq!(dict.to_json_value(), json!({"port": 80}));
    /// # Ok::<_, cafeteria::CafeteriaError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::Gathering`] when figment cannot produce the
    /// data, or [`CafeteriaError::NotAMapping`] if it is not a map.
    pub fn from_figment(kind: MergeKind, figment: &Figment) -> CafeteriaResult<Self> {
        let value: JsonValue = figment.extract().map_err(CafeteriaError::gathering)?;
        Self::from_json_value(kind, value)
    }
}
