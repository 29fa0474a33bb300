//! Core wire types and error taxonomy for jad
//!
//! This crate provides the foundation shared by the jad server and client:
//!
//! - **Envelope**: the uniform wire wrapper carrying a status string and an
//!   optional result payload
//! - **Errors**: the status-carrying error capability ([`ErrorStatus`]), the
//!   tagged method error ([`CallError`]) and the engine error type
//! - **Codec**: envelope serialization and deserialization utilities
//! - **Observability**: tracing subscriber initialization
//!
//! # Overview
//!
//! jad turns the public methods of an in-process service object into remotely
//! callable JSON operations. Every response, success or failure, travels as a
//! single JSON envelope:
//!
//! ```json
//! { "status": "ok", "result": { "Echo": "hi" } }
//! ```
//!
//! The `status` field is `"ok"` on success and otherwise one of a small,
//! stable set of taxonomy codes (or custom text supplied through
//! [`ErrorStatus`]). The `result` field is present only on success.
//!
//! # Architecture
//!
//! This crate is transport-agnostic: it defines what goes over the wire, not
//! how it gets there. The `jad-server` crate builds the registry and dispatch
//! engine on top of these types; `jad-client` builds the caller side.
//!
//! # Example
//!
//! ```rust
//! use jad_core::{codec, ResponseEnvelope, STATUS_OK};
//!
//! let envelope = ResponseEnvelope::ok(serde_json::json!({"Echo": "hi"}));
//! let bytes = codec::encode_envelope(&envelope).unwrap();
//!
//! let decoded = codec::decode_envelope(&bytes).unwrap();
//! assert_eq!(decoded.status, STATUS_OK);
//! ```

pub mod codec;
pub mod envelope;
pub mod error;
pub mod observability;

// Re-export the most commonly used items for convenience
pub use envelope::{
    ResponseEnvelope, STATUS_BAD_REQUEST, STATUS_BAD_REQUEST_BODY, STATUS_CALL_ERROR,
    STATUS_NO_SUCH_METHOD, STATUS_OK,
};
pub use error::{CallError, Error, ErrorStatus, Result};
pub use observability::{init_observability, ObservabilityConfig};
