//! Backing key-value store collaborator.
//!
//! SYSTEM CONTEXT
//! ==============
//! The persisted-value layer never touches `localStorage` (or any other
//! ambient store) directly. Everything goes through [`KeyValueStore`], a flat
//! string-to-string interface, so tests and native builds can substitute an
//! in-memory fake.

use std::rc::Rc;

/// Failure reported by a [`KeyValueStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The store refused the write because it would exceed its capacity.
    #[error("storage quota exceeded (write needs {bytes} bytes)")]
    QuotaExceeded { bytes: usize },
    /// The store is disabled or missing in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Any other rejection raised by the store.
    #[error("storage rejected operation: {0}")]
    Rejected(String),
}

impl BackendError {
    /// Whether this error means the store cannot be used at all.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Synchronous string key-value store.
///
/// `get` returns `Ok(None)` when no entry exists for `key`; that absent
/// sentinel is distinct from every stored string, including `""`.
pub trait KeyValueStore {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, overwriting any prior entry.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete the entry for `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), BackendError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
