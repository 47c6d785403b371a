//! Diagnostic sink writing to the browser console.

use persisted_state::{Diagnostic, DiagnosticSink};

/// Reports storage diagnostics as console warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, diagnostic: &Diagnostic) {
        leptos::logging::warn!("persisted state degraded: {diagnostic}");
    }
}
