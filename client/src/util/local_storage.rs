//! `localStorage` backend for persisted values.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`BrowserStorage`] adapts `window.localStorage` to the flat
//! [`KeyValueStore`] interface. Hooks share one [`PersistedValueStore`] per
//! thread through [`local_store`], so a write made by one hook reaches every
//! other hook bound to the same key on the page. [`init_local_store`] sets
//! its namespace and absent-value policy at startup.
//!
//! TRADE-OFFS
//! ==========
//! Without `hydrate` the backend stores nothing: reads report no entry and
//! writes succeed without effect, keeping server rendering deterministic.
//! A browser with storage disabled instead fails every call as unavailable,
//! which the store degrades to in-memory behavior.

use std::cell::OnceCell;

use persisted_state::{BackendError, DiagnosticSink, KeyValueStore, PersistedValueStore, StoreConfig};

use super::console_sink::ConsoleSink;

#[cfg(test)]
#[path = "local_storage_test.rs"]
mod local_storage_test;

/// Handle to `window.localStorage`, if the environment provides one.
#[derive(Clone, Debug, Default)]
pub struct BrowserStorage {
    #[cfg(feature = "hydrate")]
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    /// Resolve `window.localStorage`.
    pub fn local() -> Self {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            Self { storage }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self {}
        }
    }

    /// Whether a real browser store backs this handle.
    pub fn is_available(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            self.storage.is_some()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }

    #[cfg(feature = "hydrate")]
    fn handle(&self) -> Result<&web_sys::Storage, BackendError> {
        self.storage
            .as_ref()
            .ok_or_else(|| BackendError::Unavailable("localStorage is not available".to_owned()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            self.handle()?.get_item(key).map_err(|e| js_error(&e, 0))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            self.handle()?
                .set_item(key, value)
                .map_err(|e| js_error(&e, key.len() + value.len()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            self.handle()?.remove_item(key).map_err(|e| js_error(&e, 0))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

/// Map a DOM exception name to a [`BackendError`].
///
/// `bytes` is the size of the attempted write, reported on quota errors.
pub fn classify_dom_error(name: Option<&str>, message: &str, bytes: usize) -> BackendError {
    match name {
        // Firefox reports quota errors under its own legacy name.
        Some("QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED") => BackendError::QuotaExceeded { bytes },
        Some("SecurityError" | "InvalidStateError") => BackendError::Unavailable(message.to_owned()),
        _ => BackendError::Rejected(message.to_owned()),
    }
}

#[cfg(feature = "hydrate")]
fn js_error(error: &wasm_bindgen::JsValue, bytes: usize) -> BackendError {
    use wasm_bindgen::JsCast;

    match error.dyn_ref::<web_sys::DomException>() {
        Some(dom) => classify_dom_error(Some(&dom.name()), &dom.message(), bytes),
        None => classify_dom_error(None, &format!("{error:?}"), bytes),
    }
}

thread_local! {
    static LOCAL_STORE: OnceCell<PersistedValueStore<BrowserStorage>> = const { OnceCell::new() };
}

/// Configure the page-wide store before its first use.
///
/// Call once at startup, before any hook runs; the browser has no process
/// environment to read a configuration from.
///
/// # Errors
///
/// Returns `config` back if the store was already created, either by an
/// earlier call or by a hook using the default configuration.
pub fn init_local_store(config: StoreConfig) -> Result<(), StoreConfig> {
    LOCAL_STORE.with(|cell| {
        if cell.get().is_some() {
            return Err(config);
        }
        cell.set(build_local_store(config))
            .map_err(|store| store.config().clone())
    })
}

/// The page-wide persisted-value store over `localStorage`.
///
/// Created with [`StoreConfig::default`] unless [`init_local_store`] ran
/// first.
pub fn local_store() -> PersistedValueStore<BrowserStorage> {
    LOCAL_STORE.with(|cell| cell.get_or_init(|| build_local_store(StoreConfig::default())).clone())
}

fn build_local_store(config: StoreConfig) -> PersistedValueStore<BrowserStorage> {
    PersistedValueStore::from_parts(
        BrowserStorage::local(),
        config,
        Some(Box::new(ConsoleSink) as Box<dyn DiagnosticSink>),
    )
}
