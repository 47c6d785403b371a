//! # browser-state
//!
//! Leptos hooks over browser state: values persisted to `localStorage`,
//! network connectivity, and a viewport-width breakpoint.
//!
//! Persistence is delegated to the `persisted-state` crate; this crate only
//! supplies the `localStorage` backend, a console diagnostic sink, and the
//! signal wiring. Browser access is compiled in with the `hydrate` feature.
//! Without it (SSR, native tests) every browser call is a deterministic
//! no-op.

pub mod hooks;
pub mod util;
