//! Browser glue shared by the hooks.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from hook logic so
//! the reactive wiring stays testable without a DOM.

pub mod console_sink;
pub mod local_storage;
