//! The response envelope and status taxonomy
//!
//! Every jad response is a single JSON object with a `status` string and, on
//! success only, a `result` payload. Clients match on the status string, so
//! the taxonomy values below are stable and exact.
//!
//! # Status Taxonomy
//!
//! | status | trigger |
//! |---|---|
//! | `ok` | successful invocation |
//! | `no such method` | target name not found in the registry |
//! | `bad request body` | body read failure |
//! | `bad request` | payload failed to decode into the request shape |
//! | `call error` | method returned a plain (non-status-carrying) error |
//! | custom text | method or hook supplied an [`ErrorStatus`](crate::ErrorStatus) |
//!
//! The internal text of plain errors is never echoed into `call error`
//! responses; only `ErrorStatus`-carrying errors intentionally expose custom
//! text to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a successful invocation.
pub const STATUS_OK: &str = "ok";
/// Status when the target name is not in the registry.
pub const STATUS_NO_SUCH_METHOD: &str = "no such method";
/// Status when the request body could not be read from the transport.
pub const STATUS_BAD_REQUEST_BODY: &str = "bad request body";
/// Status when the payload could not be decoded into the request shape.
pub const STATUS_BAD_REQUEST: &str = "bad request";
/// Status when the method failed without supplying its own status text.
pub const STATUS_CALL_ERROR: &str = "call error";

/// The uniform wire wrapper for every response
///
/// `result` is serialized only when present, which by construction is only
/// when `status` is [`STATUS_OK`]. All failure paths produce a bare status
/// envelope.
///
/// # Examples
///
/// ```rust
/// use jad_core::{ResponseEnvelope, STATUS_NO_SUCH_METHOD};
///
/// let ok = ResponseEnvelope::ok(serde_json::json!({"Num": 42}));
/// assert!(ok.is_ok());
///
/// let miss = ResponseEnvelope::status(STATUS_NO_SUCH_METHOD);
/// assert!(!miss.is_ok());
/// assert!(miss.result.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Outcome of the call: `"ok"` or a taxonomy code / custom status text.
    pub status: String,
    /// The response payload, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ResponseEnvelope {
    /// Create a success envelope carrying a result payload.
    pub fn ok(result: Value) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            result: Some(result),
        }
    }

    /// Create a failure envelope carrying only a status string.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            result: None,
        }
    }

    /// Whether this envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
