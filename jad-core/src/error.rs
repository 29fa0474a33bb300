//! Error types for jad
//!
//! Three layers of errors live here, matching the three audiences:
//!
//! - [`ErrorStatus`]: the status-carrying capability. An error wrapping it
//!   puts its message verbatim on the wire as the envelope status. This is
//!   the one deliberate channel for exposing failure text to callers.
//! - [`CallError`]: what exposed methods return. A tagged variant: either it
//!   carries an `ErrorStatus` (caller-visible text) or it is a plain failure
//!   whose detail stays server-side and collapses to `"call error"` on the
//!   wire.
//! - [`Error`]: engine-level failures (codec, transport, the unrecoverable
//!   response-encode path) used by the dispatcher and the client.

use thiserror::Error;

/// Result type for jad operations
///
/// Convenience alias used throughout the jad crates.
pub type Result<T> = std::result::Result<T, Error>;

/// A wire-visible status text carried by an error
///
/// Any error holding an `ErrorStatus` supplies its own envelope status: the
/// dispatcher writes the message verbatim instead of a taxonomy code. Hooks
/// reject requests with it, and methods return it through
/// [`CallError::Status`].
///
/// # Examples
///
/// ```rust
/// use jad_core::{CallError, ErrorStatus};
///
/// let status = ErrorStatus::new("quota exceeded");
/// assert_eq!(status.as_str(), "quota exceeded");
///
/// // Methods usually go through CallError:
/// let err: CallError = status.into();
/// assert!(matches!(err, CallError::Status(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ErrorStatus(String);

impl ErrorStatus {
    /// Create a status from its wire text.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The text that goes on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the status, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ErrorStatus {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorStatus {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Error returned by an exposed method
///
/// The two variants draw the line between caller-visible and server-side
/// failure detail:
///
/// - `Status`: the method chose its own envelope status; the text is sent
///   verbatim.
/// - `Failed`: an internal failure. The message is logged on the server but
///   the envelope only says `"call error"`, so internals never leak.
///
/// # Examples
///
/// ```rust
/// use jad_core::CallError;
///
/// // Caller sees exactly "insufficient funds":
/// let rejected = CallError::status("insufficient funds");
///
/// // Caller sees "call error"; the detail stays in the server log:
/// let broken = CallError::failed("db connection refused");
/// # let _ = (rejected, broken);
/// ```
#[derive(Debug, Error)]
pub enum CallError {
    /// Failure carrying its own wire-visible status text.
    #[error("{0}")]
    Status(#[from] ErrorStatus),

    /// Plain failure; collapsed to `"call error"` on the wire.
    #[error("{0}")]
    Failed(String),
}

impl CallError {
    /// Fail with caller-visible status text.
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status(ErrorStatus::new(message))
    }

    /// Fail with server-side detail only.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Engine-level error type
///
/// Covers the failures of the machinery around method calls: codec errors,
/// client transport errors, and the single unrecoverable dispatch path
/// (encoding a response shape after the method already succeeded).
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization or deserialization error
    ///
    /// Converting between Rust types and JSON failed, usually a mismatch
    /// between the expected and actual data structure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The response shape could not be encoded after a successful call
    ///
    /// The dispatcher had already committed to a success response, so this
    /// cannot be downgraded to a status envelope. It is fatal for the one
    /// request; the transport decides what to do with the connection.
    #[error("response encode failed: {0}")]
    ResponseEncode(String),

    /// Client-side transport failure
    ///
    /// The request never produced a response envelope. Subject to the
    /// client's retry policy.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-`"ok"` envelope status
    ///
    /// Carries the status text exactly as received.
    #[error("call rejected: {0}")]
    Rejected(String),

    /// Observability initialization failed
    #[error("observability init failed: {0}")]
    Observability(String),
}
