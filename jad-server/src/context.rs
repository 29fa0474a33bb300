//! Per-request call context
//!
//! A [`CallContext`] exists for exactly one request: it is created after the
//! body has been read and parsed, handed to the invocation, and dropped when
//! the response is written. It is never stored ambiently; handlers that want
//! it declare the contextual signature and receive it as a parameter.

use crate::transport::RawRequest;
use serde_json::Value;

/// Call metadata for one in-flight request
///
/// Carries the resolved method name, the raw body bytes, the decoded payload
/// value, and the transport request (body already consumed). Contextual
/// handlers use it to reach transport-level detail, for example headers set
/// by an upstream proxy, without the engine baking any transport knowledge
/// into method signatures.
#[derive(Debug)]
pub struct CallContext {
    method: String,
    raw: Vec<u8>,
    args: Value,
    request: RawRequest,
}

impl CallContext {
    pub(crate) fn new(method: String, raw: Vec<u8>, args: Value, request: RawRequest) -> Self {
        Self {
            method,
            raw,
            args,
            request,
        }
    }

    /// The resolved method name this request dispatched to.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request body exactly as it arrived.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The decoded request payload.
    pub fn args(&self) -> &Value {
        &self.args
    }

    /// The transport request. Its body has been consumed; target and
    /// headers remain available.
    pub fn request(&self) -> &RawRequest {
        &self.request
    }
}
