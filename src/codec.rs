//! JSON encoding between typed values and stored text.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error returned by [`encode`] and [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value cannot be represented as JSON.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
    /// The stored text is not valid JSON for the requested type.
    #[error("failed to decode stored value: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result of encoding a value for storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoded {
    /// JSON text to persist.
    Text(String),
    /// The value encodes to JSON `null` and its type accepts `null` back
    /// (`None`, `()`); there is no meaningful stored form.
    Absent,
}

const JSON_NULL: &str = "null";

/// Encode `value` as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] for values JSON cannot represent, such as
/// maps keyed by non-string types or non-finite floats.
pub fn encode<T>(value: &T) -> Result<Encoded, CodecError>
where
    T: Serialize + ToOwned + ?Sized,
    T::Owned: DeserializeOwned,
{
    encode_as::<T, T::Owned>(value)
}

/// Encode `value`, requiring the text to decode back as `D`.
///
/// serde_json writes `NaN` and infinities as `null`, so text that does not
/// decode as `D` is an encode failure rather than a stored value. `null`
/// is [`Encoded::Absent`] only when `D` itself accepts `null`.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] when serialization fails or the text does
/// not decode as `D`.
pub fn encode_as<T, D>(value: &T) -> Result<Encoded, CodecError>
where
    T: Serialize + ?Sized,
    D: DeserializeOwned,
{
    let text = serde_json::to_string(value).map_err(CodecError::Encode)?;
    serde_json::from_str::<D>(&text).map_err(CodecError::Encode)?;
    if text == JSON_NULL {
        return Ok(Encoded::Absent);
    }
    Ok(Encoded::Text(text))
}

/// Decode stored JSON text into `T`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed text or a shape mismatch.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::Decode)
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
