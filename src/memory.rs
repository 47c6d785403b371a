//! In-memory [`KeyValueStore`] with injectable failures.
//!
//! DESIGN
//! ======
//! Clones share one map, so a test can hand a clone to the store under test
//! and inspect or corrupt raw entries through another. Failure toggles model
//! the browser conditions the persisted-value layer must survive: a full
//! quota, a store that rejects writes, and a store disabled outright.
//! Inspection helpers (`raw`, `insert_raw`, ...) bypass those toggles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::backend::{BackendError, KeyValueStore};

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    reject_writes: bool,
    unavailable: bool,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// Shared in-memory string store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects any write pushing total key + value bytes past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().quota_bytes = Some(bytes);
        store
    }

    /// Make `set` and `remove` fail with [`BackendError::Rejected`].
    pub fn set_rejecting_writes(&self, reject: bool) {
        self.inner.borrow_mut().reject_writes = reject;
    }

    /// Make every operation fail with [`BackendError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    /// Raw stored text for `key`, ignoring failure toggles.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Place raw text under `key`, ignoring quota and failure toggles.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.borrow_mut().entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    fn check_writable(inner: &MemoryInner) -> Result<(), BackendError> {
        if inner.unavailable {
            return Err(BackendError::Unavailable("memory store disabled".into()));
        }
        if inner.reject_writes {
            return Err(BackendError::Rejected("memory store is rejecting writes".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(BackendError::Unavailable("memory store disabled".into()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut inner = self.inner.borrow_mut();
        Self::check_writable(&inner)?;
        if let Some(quota) = inner.quota_bytes {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(BackendError::QuotaExceeded { bytes: needed });
            }
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut inner = self.inner.borrow_mut();
        Self::check_writable(&inner)?;
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
