//! Typed values mirrored into a [`KeyValueStore`].
//!
//! DESIGN
//! ======
//! The in-memory value held by a consumer is the source of truth; the backing
//! store is a write-through mirror that only matters at hydration time. Every
//! read and write therefore degrades instead of failing: a missing or
//! malformed entry yields the caller's default, and a rejected write leaves
//! the caller's value untouched. Failures are reported to the injected
//! [`DiagnosticSink`].
//!
//! TRADE-OFFS
//! ==========
//! Values encoding to JSON `null` have no meaningful stored form. By default
//! writing one removes the entry so the next hydration yields the default;
//! `AbsentValuePolicy::Skip` leaves the store untouched instead.
//!
//! Two independent stores over the same backing key race with
//! last-writer-wins semantics. Only clones of one store see each other's
//! writes through `subscribe`.

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{BackendError, KeyValueStore};
use crate::codec::{self, Encoded};
use crate::config::{AbsentValuePolicy, StoreConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use crate::entry::{Entry, LiveGuard, LiveKeys};
use crate::error::StorageError;
use crate::subscription::{self, SharedRegistry, Subscription, SubscriptionId};

/// What a `write` or `remove` did to the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The encoded value is now stored.
    Persisted,
    /// The entry was removed.
    Removed,
    /// The store was left untouched by policy.
    Skipped,
    /// The operation failed and was reported; the store is unchanged.
    Failed,
}

impl WriteOutcome {
    #[must_use]
    pub fn is_durable(self) -> bool {
        matches!(self, Self::Persisted | Self::Removed)
    }
}

type SharedSink = Option<Rc<dyn DiagnosticSink>>;

struct StoreInner<S> {
    backend: S,
    config: StoreConfig,
    sink: SharedSink,
    registry: SharedRegistry,
    live: LiveKeys,
}

/// Persisted-value store over backend `S`.
///
/// Clones share the backend, configuration, sink, subscribers, and the set
/// of live entries.
pub struct PersistedValueStore<S> {
    inner: Rc<StoreInner<S>>,
}

impl<S> Clone for PersistedValueStore<S> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<S: KeyValueStore> PersistedValueStore<S> {
    /// Store with default config that reports through `tracing`.
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(backend: S, config: StoreConfig) -> Self {
        Self::from_parts(backend, config, Some(Box::new(TracingSink) as Box<dyn DiagnosticSink>))
    }

    /// Store with an explicit sink; `None` disables reporting only.
    #[must_use]
    pub fn from_parts(backend: S, config: StoreConfig, sink: Option<Box<dyn DiagnosticSink>>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                backend,
                config,
                sink: sink.map(Rc::from),
                registry: SharedRegistry::default(),
                live: LiveKeys::default(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &S {
        &self.inner.backend
    }

    /// Number of registered change listeners across all keys.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Hydrate the value for `key`, falling back to `default`.
    ///
    /// Never fails: an empty key, an unavailable store, and undecodable text
    /// all yield `default` (and a diagnostic). A missing entry or an empty
    /// stored string yields `default` silently.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        if key.is_empty() {
            self.report(DiagnosticKind::InvalidKey, key, StorageError::EmptyKey);
            return default;
        }
        let raw = match self.inner.backend.get(&self.inner.config.storage_key(key)) {
            Ok(raw) => raw,
            Err(e) => {
                self.report(DiagnosticKind::StoreUnavailable, key, e);
                return default;
            }
        };
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return default;
        };
        match codec::decode(&raw) {
            Ok(value) => value,
            Err(e) => {
                self.report(DiagnosticKind::DecodeFailure, key, e);
                default
            }
        }
    }

    /// Persist `value` under `key`, overwriting any prior entry.
    ///
    /// Failures are reported, never returned; the outcome says what happened
    /// to the backing store. Durable outcomes notify same-key subscribers.
    /// A value whose JSON text does not read back as its own type (a
    /// non-finite float, say) is a write failure.
    pub fn write<T>(&self, key: &str, value: &T) -> WriteOutcome
    where
        T: Serialize + ToOwned + ?Sized,
        T::Owned: DeserializeOwned,
    {
        self.write_as::<T, T::Owned>(key, value)
    }

    pub(crate) fn write_as<T, D>(&self, key: &str, value: &T) -> WriteOutcome
    where
        T: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        if key.is_empty() {
            self.report(DiagnosticKind::InvalidKey, key, StorageError::EmptyKey);
            return WriteOutcome::Failed;
        }
        let text = match codec::encode_as::<T, D>(value) {
            Ok(Encoded::Text(text)) => text,
            Ok(Encoded::Absent) => {
                return match self.inner.config.absent_policy {
                    AbsentValuePolicy::Remove => self.remove(key),
                    AbsentValuePolicy::Skip => WriteOutcome::Skipped,
                };
            }
            Err(e) => {
                self.report(DiagnosticKind::StoreWriteFailure, key, e);
                return WriteOutcome::Failed;
            }
        };
        match self.inner.backend.set(&self.inner.config.storage_key(key), &text) {
            Ok(()) => {
                subscription::notify(&self.inner.registry, key, Some(&text));
                WriteOutcome::Persisted
            }
            Err(e) => {
                self.report_backend_write(key, e);
                WriteOutcome::Failed
            }
        }
    }

    /// Delete the stored entry for `key`.
    pub fn remove(&self, key: &str) -> WriteOutcome {
        if key.is_empty() {
            self.report(DiagnosticKind::InvalidKey, key, StorageError::EmptyKey);
            return WriteOutcome::Failed;
        }
        match self.inner.backend.remove(&self.inner.config.storage_key(key)) {
            Ok(()) => {
                subscription::notify(&self.inner.registry, key, None);
                WriteOutcome::Removed
            }
            Err(e) => {
                self.report_backend_write(key, e);
                WriteOutcome::Failed
            }
        }
    }

    /// Call `on_change` after every durable write or removal of `key` made
    /// through this store or any of its clones.
    ///
    /// Removal delivers `None`. Stored text that does not decode as `T` is
    /// reported and not delivered.
    pub fn subscribe<T, F>(&self, key: &str, on_change: F) -> Subscription
    where
        T: DeserializeOwned + 'static,
        F: Fn(Option<T>) + 'static,
    {
        let sink = self.inner.sink.clone();
        let owned_key = key.to_owned();
        let listener = Rc::new(move |raw: Option<&str>| match raw {
            None => on_change(None),
            Some(raw) => match codec::decode::<T>(raw) {
                Ok(value) => on_change(Some(value)),
                Err(e) => report_to(sink.as_ref(), DiagnosticKind::DecodeFailure, &owned_key, e),
            },
        });
        let id = self.inner.registry.borrow_mut().insert(key, listener);
        Subscription::new(&self.inner.registry, id)
    }

    /// Remove a listener previously detached from its [`Subscription`].
    ///
    /// Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.registry.borrow_mut().take(id);
        removed.is_some()
    }

    /// Hydrate `key` into a live [`Entry`] that persists every mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EmptyKey`] for an empty key and
    /// [`StorageError::EntryAlreadyLive`] while another entry for `key` from
    /// this store is alive.
    pub fn acquire<T>(&self, default: T, key: &str) -> Result<Entry<S, T>, StorageError>
    where
        T: Serialize + DeserializeOwned,
    {
        if key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        let guard = LiveGuard::claim(&self.inner.live, key)?;
        let value = self.read(key, default);
        Ok(Entry::new(self.clone(), key.to_owned(), value, guard))
    }

    /// Whether an [`Entry`] for `key` is currently alive.
    #[must_use]
    pub fn is_live(&self, key: &str) -> bool {
        self.inner.live.borrow().contains(key)
    }

    fn report_backend_write(&self, key: &str, error: BackendError) {
        let kind = if error.is_unavailable() {
            DiagnosticKind::StoreUnavailable
        } else {
            DiagnosticKind::StoreWriteFailure
        };
        self.report(kind, key, error);
    }

    fn report(&self, kind: DiagnosticKind, key: &str, error: impl Into<StorageError>) {
        report_to(self.inner.sink.as_ref(), kind, key, error);
    }
}

fn report_to(sink: Option<&Rc<dyn DiagnosticSink>>, kind: DiagnosticKind, key: &str, error: impl Into<StorageError>) {
    if let Some(sink) = sink {
        sink.report(&Diagnostic::new(kind, key, error));
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
