//! In-process change notifications for persisted keys.
//!
//! Listeners are keyed by logical key and receive the raw stored text after a
//! successful write (`Some`) or removal (`None`). Typed decoding happens in the
//! closure the store wraps around the caller's callback.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub(crate) type Listener = Rc<dyn Fn(Option<&str>)>;

/// Identifier of a registered listener, detached from its guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, (String, Listener)>,
}

impl Registry {
    pub(crate) fn insert(&mut self, key: &str, listener: Listener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, (key.to_owned(), listener));
        SubscriptionId(id)
    }

    /// Unregister `id`, handing the listener back to the caller.
    ///
    /// The caller drops it after releasing the registry borrow: a listener
    /// may own other guards whose `Drop` re-enters the registry.
    #[must_use]
    pub(crate) fn take(&mut self, id: SubscriptionId) -> Option<(String, Listener)> {
        self.listeners.remove(&id.0)
    }

    /// Listeners for `key`, in registration order.
    pub(crate) fn listeners_for(&self, key: &str) -> Vec<Listener> {
        self.listeners
            .values()
            .filter(|(k, _)| k == key)
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

pub(crate) type SharedRegistry = Rc<RefCell<Registry>>;

/// Deliver `raw` to every listener on `key`.
///
/// The registry borrow is released before any listener runs, so listeners may
/// subscribe, unsubscribe, or write through the store.
pub(crate) fn notify(registry: &SharedRegistry, key: &str, raw: Option<&str>) {
    let listeners = registry.borrow().listeners_for(key);
    for listener in listeners {
        listener(raw);
    }
}

/// Guard for a registered listener; unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: SubscriptionId,
}

impl Subscription {
    pub(crate) fn new(registry: &SharedRegistry, id: SubscriptionId) -> Self {
        Self { registry: Rc::downgrade(registry), id }
    }

    /// Identifier of the listener this guard owns.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stop receiving notifications now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the listener registered past this guard and return its id, for
    /// contexts that can only hold plain data until cleanup.
    #[must_use]
    pub fn detach(mut self) -> SubscriptionId {
        self.registry = Weak::new();
        self.id
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let removed = registry.borrow_mut().take(self.id);
            drop(removed);
        }
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "subscription_test.rs"]
mod tests;
