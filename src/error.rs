//! Crate-level error type.

use crate::backend::BackendError;
use crate::codec::CodecError;

/// Any failure the persisted-value layer can observe.
///
/// Data-path failures (codec, backend) are never returned to readers or
/// writers; they travel inside a [`Diagnostic`](crate::diagnostics::Diagnostic)
/// instead. Only contract misuse at `acquire` time is returned as `Err`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("storage key must not be empty")]
    EmptyKey,
    #[error("an entry for key '{0}' is already live in this store")]
    EntryAlreadyLive(String),
}
