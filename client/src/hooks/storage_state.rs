//! Signal pair persisted to `localStorage` under a key.
//!
//! SYSTEM CONTEXT
//! ==============
//! The value is hydrated synchronously from the shared [`local_store`], so
//! the first render already sees the stored value. Later changes to the
//! signal are written back; the initial value is not. Hooks bound to the
//! same key follow each other through store subscriptions.
//!
//! TRADE-OFFS
//! ==========
//! A change made by one hook is written once by that hook and echoed back by
//! every follower's effect. Followers drop values equal to their current one,
//! which bounds the echo to a single extra write per follower. The store-side
//! half of that protocol lives in `StoredKey` so it runs without a reactive
//! owner.

use leptos::prelude::*;
use persisted_state::{KeyValueStore, PersistedValueStore, Subscription, WriteOutcome};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::local_storage::local_store;

#[cfg(test)]
#[path = "storage_state_test.rs"]
mod storage_state_test;

/// Reactive value persisted under `key`, starting from the stored value or
/// `default`.
///
/// Use `WriteSignal::update` for read-modify-write changes.
pub fn use_storage_state<T>(default: T, key: &str) -> (ReadSignal<T>, WriteSignal<T>)
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    let stored = StoredKey::new(local_store(), key);
    let (value, set_value) = signal(stored.hydrate(default.clone()));

    let writer = stored.clone();
    Effect::watch(
        move || value.get(),
        move |next: &T, _, _| {
            writer.persist(next);
        },
        false,
    );

    let id = stored
        .follow(
            default,
            move |incoming: &T| value.with_untracked(|current| current == incoming),
            move |incoming| set_value.set(incoming),
        )
        .detach();
    on_cleanup(move || {
        local_store().unsubscribe(id);
    });

    (value, set_value)
}

/// [`use_storage_state`] with the key first.
pub fn use_local_storage<T>(key: &str, initial: T) -> (ReadSignal<T>, WriteSignal<T>)
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    use_storage_state(initial, key)
}

/// One key of a store, as seen by a single hook.
pub(crate) struct StoredKey<S> {
    store: PersistedValueStore<S>,
    key: String,
}

impl<S> Clone for StoredKey<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), key: self.key.clone() }
    }
}

impl<S: KeyValueStore + 'static> StoredKey<S> {
    pub(crate) fn new(store: PersistedValueStore<S>, key: &str) -> Self {
        Self { store, key: key.to_owned() }
    }

    /// Initial value; reading never writes.
    pub(crate) fn hydrate<T: DeserializeOwned>(&self, default: T) -> T {
        self.store.read(&self.key, default)
    }

    /// Write one changed value.
    pub(crate) fn persist<T>(&self, value: &T) -> WriteOutcome
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.store.write(&self.key, value)
    }

    /// Deliver values written under the key by others, mapping removals back
    /// to `default`. Values for which `is_current` holds are dropped, which
    /// ends the echo of a change back to the hook that made it.
    pub(crate) fn follow<T, C, F>(&self, default: T, is_current: C, apply: F) -> Subscription
    where
        T: DeserializeOwned + Clone + 'static,
        C: Fn(&T) -> bool + 'static,
        F: Fn(T) + 'static,
    {
        self.store.subscribe::<T, _>(&self.key, move |incoming| {
            let incoming = incoming.unwrap_or_else(|| default.clone());
            if !is_current(&incoming) {
                apply(incoming);
            }
        })
    }
}
