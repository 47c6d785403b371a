//! Live handle pairing a current value with its persisting setter.
//!
//! An [`Entry`] is the `(value, set_value)` pair a consumer works with. It is
//! hydrated once, synchronously, when acquired; from then on every mutation
//! replaces the in-memory value first and then attempts exactly one write.
//! A failed write never rolls the in-memory value back.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::KeyValueStore;
use crate::error::StorageError;
use crate::store::{PersistedValueStore, WriteOutcome};

pub(crate) type LiveKeys = Rc<RefCell<HashSet<String>>>;

/// Marks a key as live until dropped.
pub(crate) struct LiveGuard {
    live: Weak<RefCell<HashSet<String>>>,
    key: String,
}

impl LiveGuard {
    pub(crate) fn claim(live: &LiveKeys, key: &str) -> Result<Self, StorageError> {
        if !live.borrow_mut().insert(key.to_owned()) {
            return Err(StorageError::EntryAlreadyLive(key.to_owned()));
        }
        Ok(Self { live: Rc::downgrade(live), key: key.to_owned() })
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        if let Some(live) = self.live.upgrade() {
            live.borrow_mut().remove(&self.key);
        }
    }
}

/// New value, or a pure function of the previous one.
pub enum SetValue<T> {
    Replace(T),
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> SetValue<T> {
    /// Wrap a read-modify-write function.
    pub fn update<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + 'static,
    {
        Self::Update(Box::new(f))
    }

    fn resolve(self, previous: &T) -> T {
        match self {
            Self::Replace(value) => value,
            Self::Update(f) => f(previous),
        }
    }
}

impl<T> From<T> for SetValue<T> {
    fn from(value: T) -> Self {
        Self::Replace(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SetValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// A hydrated value for one key, persisted on every mutation.
pub struct Entry<S, T> {
    store: PersistedValueStore<S>,
    key: String,
    value: T,
    _live: LiveGuard,
}

impl<S, T: fmt::Debug> fmt::Debug for Entry<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<S, T> Entry<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(store: PersistedValueStore<S>, key: String, value: T, live: LiveGuard) -> Self {
        Self { store, key, value, _live: live }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.clone()
    }

    /// Replace the value and persist it.
    pub fn set(&mut self, value: T) -> WriteOutcome {
        self.value = value;
        self.store.write_as::<T, T>(&self.key, &self.value)
    }

    /// Replace the value with `f(previous)` and persist it.
    pub fn update<F>(&mut self, f: F) -> WriteOutcome
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }

    /// Apply either form of [`SetValue`].
    pub fn apply(&mut self, action: impl Into<SetValue<T>>) -> WriteOutcome {
        let next = action.into().resolve(&self.value);
        self.set(next)
    }

    /// Re-hydrate from the backing store.
    ///
    /// A missing or malformed stored value keeps the current one. Returns
    /// whether the value changed. Does not write.
    pub fn refresh(&mut self) -> bool
    where
        T: PartialEq,
    {
        match self.store.read::<Option<T>>(&self.key, None) {
            Some(stored) if stored != self.value => {
                self.value = stored;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

#[cfg(test)]
#[path = "entry_test.rs"]
mod tests;
