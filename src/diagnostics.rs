//! Diagnostic reporting for non-fatal storage failures.
//!
//! DESIGN
//! ======
//! Failures on the data path degrade to in-memory behavior and are reported
//! here rather than returned. The sink is injected; a store built without one
//! behaves identically apart from staying silent.

use std::fmt;

use crate::error::StorageError;

/// Classification of a degraded operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Stored text did not decode; the default value was used.
    DecodeFailure,
    /// A write or remove was rejected; the in-memory value stays authoritative.
    StoreWriteFailure,
    /// The backing store is disabled or missing.
    StoreUnavailable,
    /// The caller passed an empty key.
    InvalidKey,
}

impl DiagnosticKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DecodeFailure => "decode_failure",
            Self::StoreWriteFailure => "store_write_failure",
            Self::StoreUnavailable => "store_unavailable",
            Self::InvalidKey => "invalid_key",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One degraded operation on a logical key.
#[derive(Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Logical key, before namespacing.
    pub key: String,
    pub error: StorageError,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, key: impl Into<String>, error: impl Into<StorageError>) -> Self {
        Self { kind, key: key.into(), error: error.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for key '{}': {}", self.kind, self.key, self.error)
    }
}

/// Receiver of [`Diagnostic`]s.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic),
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}

/// Default sink: a `tracing` warning per diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            key = %diagnostic.key,
            kind = %diagnostic.kind,
            error = %diagnostic.error,
            "persisted value degraded"
        );
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
