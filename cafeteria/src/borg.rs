//! Shared keyed state, one state per type.
//!
//! Every [`BorgDict`] handle for the same marker type reads and writes the same
//! entries, while distinct marker types keep separate states. States live in a
//! [`BorgRegistry`] keyed by [`TypeId`]; each is created lazily from
//! [`Borg::init_state`] on first access. The process-wide registry returned by
//! [`BorgRegistry::global`] lives until the process exits.
//!
//! # Examples
//!
//! ```
//! use cafeteria::{Borg, BorgDict, BorgRegistry};
//!
//! struct Cache;
//! impl Borg for Cache {}
//!
//! let registry = BorgRegistry::new();
//! let first = BorgDict::<Cache>::with_registry(&registry);
//! let second = BorgDict::<Cache>::with_registry(&registry);
//! first.set("hits", 3);
//! assert_eq!(second.get("hits").and_then(|v| v.as_i64()), Some(3));
//! ```

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::dict::MergingDict;
use crate::error::{CafeteriaError, CafeteriaResult};
use crate::value::MergeValue;

/// Handle to one type's shared state.
pub type SharedState = Arc<Mutex<MergingDict>>;

/// Marker trait for types that own a shared state.
pub trait Borg: 'static {
    /// Initial contents of the shared state. Defaults to an empty plain map.
    #[must_use]
    fn init_state() -> MergingDict {
        MergingDict::plain()
    }
}

static GLOBAL: LazyLock<BorgRegistry> = LazyLock::new(BorgRegistry::new);

/// Registry of shared states keyed by type identity.
#[derive(Default)]
pub struct BorgRegistry {
    states: Mutex<HashMap<TypeId, SharedState>>,
}

impl BorgRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns `T`'s shared state, initialising it on first access.
    ///
    /// [`Borg::init_state`] runs without the registry lock held, so it may
    /// read other states from the same registry. If two threads initialise
    /// `T` at once, the first state inserted wins.
    #[must_use]
    pub fn state<T: Borg>(&self) -> SharedState {
        let id = TypeId::of::<T>();
        if let Some(state) = self.states.lock().get(&id) {
            return Arc::clone(state);
        }
        tracing::debug!(owner = type_name::<T>(), "initialising shared state");
        let fresh = Arc::new(Mutex::new(T::init_state()));
        Arc::clone(self.states.lock().entry(id).or_insert(fresh))
    }

    /// Returns `true` once `T`'s state has been initialised.
    #[must_use]
    pub fn contains<T: Borg>(&self) -> bool {
        self.states.lock().contains_key(&TypeId::of::<T>())
    }

    /// Drop `T`'s state so the next access re-initialises it.
    ///
    /// Handles obtained earlier keep the detached state alive. Returns `true`
    /// when a state was removed.
    pub fn reset<T: Borg>(&self) -> bool {
        self.states.lock().remove(&TypeId::of::<T>()).is_some()
    }

    /// Number of initialised states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    /// Returns `true` when no state has been initialised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.lock().is_empty()
    }
}

impl fmt::Debug for BorgRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BorgRegistry")
            .field("states", &self.len())
            .finish()
    }
}

/// A dictionary whose entries live in `T`'s shared state.
///
/// Assignment overwrites, whatever the kind of the underlying mapping; use
/// [`BorgDict::with_state`] to merge through [`MergingDict::set`].
pub struct BorgDict<T: Borg> {
    state: SharedState,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Borg> BorgDict<T> {
    /// Attach to `T`'s state in the global registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(BorgRegistry::global())
    }

    /// Attach to `T`'s state in `registry`.
    #[must_use]
    pub fn with_registry(registry: &BorgRegistry) -> Self {
        Self {
            state: registry.state::<T>(),
            _owner: PhantomData,
        }
    }

    /// Returns a copy of the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<MergeValue> {
        self.state.lock().get(key).cloned()
    }

    /// Returns a copy of the value bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CafeteriaError::KeyNotFound`] when `key` is absent.
    pub fn try_get(&self, key: &str) -> CafeteriaResult<MergeValue> {
        self.get(key)
            .ok_or_else(|| CafeteriaError::key_not_found(key))
    }

    /// Bind `key` to `value`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<MergeValue>) -> Option<MergeValue> {
        self.state.lock().replace(key, value)
    }

    /// Bind every pair, overwriting existing entries.
    pub fn update<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MergeValue>,
    {
        self.state.lock().update_pairs(pairs);
    }

    /// Unbind `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<MergeValue> {
        self.state.lock().remove(key)
    }

    /// Returns `true` when `key` is bound.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Returns `true` when the state holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().keys().map(str::to_owned).collect()
    }

    /// A copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> MergingDict {
        self.state.lock().clone()
    }

    /// Run `f` with exclusive access to the state.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MergingDict) -> R) -> R {
        f(&mut self.state.lock())
    }
}

impl<T: Borg> Default for BorgDict<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Borg> Clone for BorgDict<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _owner: PhantomData,
        }
    }
}

impl<T: Borg> fmt::Debug for BorgDict<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BorgDict")
            .field("owner", &type_name::<T>())
            .field("state", &*self.state.lock())
            .finish()
    }
}
