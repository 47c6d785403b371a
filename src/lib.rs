//! # persisted-state
//!
//! Typed values mirrored into a synchronous key-value store.
//!
//! A [`PersistedValueStore`] hydrates a value for a key from its backing
//! [`KeyValueStore`] (falling back to a caller default), encodes every
//! mutation as JSON and writes it through, and degrades to in-memory
//! behavior whenever the store is missing, full, or holds malformed data.
//!
//! This crate is UI-framework agnostic. The `browser-state` client crate
//! binds it to `localStorage` and Leptos signals.
//!
//! ```
//! use persisted_state::{MemoryStore, PersistedValueStore};
//!
//! let store = PersistedValueStore::new(MemoryStore::new());
//! let mut theme = store.acquire("light".to_owned(), "theme")?;
//! assert_eq!(theme.value(), "light");
//!
//! theme.set("dark".to_owned());
//! drop(theme);
//! assert_eq!(store.read("theme", String::new()), "dark");
//! # Ok::<(), persisted_state::StorageError>(())
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod memory;
pub mod store;
pub mod subscription;

pub use backend::{BackendError, KeyValueStore};
pub use codec::{CodecError, Encoded};
pub use config::{AbsentValuePolicy, ConfigError, StoreConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use entry::{Entry, SetValue};
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::{PersistedValueStore, WriteOutcome};
pub use subscription::{Subscription, SubscriptionId};
