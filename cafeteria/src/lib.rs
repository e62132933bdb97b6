//! Reusable configuration-value patterns.
//!
//! The centrepiece is [`MergingDict`], a string-keyed map whose assignments
//! merge into the values already stored: nested maps absorb incoming maps,
//! lists are extended, sets gain labels, and scalars are replaced. A
//! [`MergeKind::Deep`] mapping applies that rule at every depth.
//!
//! Around it sit a few helpers for configuration loaders: [`get_by_path`] for
//! nested lookups, JSON loading, a figment [`figment::Provider`]
//! implementation, [`resolve_setting`] for argument/environment/file/default
//! precedence, and the [`BorgRegistry`] for per-type shared state.

mod borg;
mod dict;
mod error;
mod json;
mod path;
mod provider;
mod settings;
mod value;

pub use borg::{Borg, BorgDict, BorgRegistry, SharedState};
pub use dict::{MergeKind, MergingDict, Seed};
pub use error::{CafeteriaError, CafeteriaResult, MergeOperation};
pub use path::{get_by_path, get_by_path_or};
pub use settings::{SettingSource, resolve_setting, resolve_setting_with_source};
pub use value::{MergeCapability, MergeValue, ValueKind};
