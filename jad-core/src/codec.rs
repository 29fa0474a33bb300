//! Envelope serialization and deserialization
//!
//! Thin typed wrappers over serde_json that map codec failures into
//! [`Error::Serialization`]. The envelope travels as raw bytes because the
//! transport boundary hands the engine byte streams, not strings.

use crate::envelope::ResponseEnvelope;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// Encode a response envelope to JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the envelope cannot be encoded. A
/// bare status envelope always encodes; a result payload is already a
/// `serde_json::Value`, so in practice this fails only on pathological
/// payloads (for example map keys that are not strings).
pub fn encode_envelope(envelope: &ResponseEnvelope) -> Result<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a response envelope from JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the bytes are not a well-formed
/// envelope.
pub fn decode_envelope(data: &[u8]) -> Result<ResponseEnvelope> {
    serde_json::from_slice(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode the `result` payload of a success envelope into a typed value.
///
/// # Errors
///
/// - [`Error::Rejected`] with the status text if the envelope is not `"ok"`
/// - [`Error::Serialization`] if `result` is absent or does not match `T`
pub fn decode_result<T: DeserializeOwned>(envelope: ResponseEnvelope) -> Result<T> {
    if !envelope.is_ok() {
        return Err(Error::Rejected(envelope.status));
    }
    let result = envelope
        .result
        .ok_or_else(|| Error::Serialization("missing result in ok envelope".to_string()))?;
    serde_json::from_value(result).map_err(|e| Error::Serialization(e.to_string()))
}
