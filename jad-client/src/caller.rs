//! The typed caller
//!
//! A [`Caller`] issues method calls against any [`CallTransport`]: it
//! serializes the argument, hands the bytes to the transport, decodes the
//! returned envelope, and extracts the typed result. Transport failures are
//! retried per the configured [`RetryPolicy`]; envelope rejections are
//! surfaced as [`Error::Rejected`] and never retried.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use jad_client::{CallTransport, Caller};
//! use jad_core::{codec, Error, ResponseEnvelope};
//!
//! /// A toy transport answering every call with {"Pong": true}.
//! struct Loopback;
//!
//! #[async_trait]
//! impl CallTransport for Loopback {
//!     async fn roundtrip(&self, _method: &str, _body: &[u8]) -> Result<Vec<u8>, Error> {
//!         codec::encode_envelope(&ResponseEnvelope::ok(serde_json::json!({"Pong": true})))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Error> {
//! let caller = Caller::new(std::sync::Arc::new(Loopback));
//! let result: serde_json::Value = caller.call("Ping", &serde_json::json!({})).await?;
//! assert_eq!(result["Pong"], true);
//! # Ok(())
//! # }
//! ```

use crate::retry::{NoRetry, RetryPolicy};
use async_trait::async_trait;
use jad_core::{codec, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Delivers one encoded request and returns the raw envelope bytes
///
/// Implemented by the integrator for whatever carries the bytes: an HTTP
/// client, a message queue bridge, an in-process dispatcher in tests.
/// Failures are reported as [`Error::Transport`] and are the only class of
/// error the caller retries.
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Deliver `body` to `method`, returning the response envelope bytes.
    async fn roundtrip(&self, method: &str, body: &[u8]) -> Result<Vec<u8>>;
}

/// Typed method caller over a [`CallTransport`].
pub struct Caller {
    transport: Arc<dyn CallTransport>,
    retry: Arc<dyn RetryPolicy>,
}

impl Caller {
    /// Create a caller that does not retry.
    pub fn new(transport: Arc<dyn CallTransport>) -> Self {
        Self {
            transport,
            retry: Arc::new(NoRetry),
        }
    }

    /// Start building a caller with a custom retry policy.
    pub fn builder(transport: Arc<dyn CallTransport>) -> CallerBuilder {
        CallerBuilder {
            transport,
            retry: None,
        }
    }

    /// Call `method` with `args`, returning the typed result.
    ///
    /// # Errors
    ///
    /// - [`Error::Serialization`] if `args` cannot be encoded or the result
    ///   does not match `Resp`
    /// - [`Error::Transport`] if every attempt failed at the transport
    /// - [`Error::Rejected`] with the status text if the server answered
    ///   with a non-`"ok"` envelope
    pub async fn call<Req, Resp>(&self, method: &str, args: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body =
            serde_json::to_vec(args).map_err(|e| Error::Serialization(e.to_string()))?;
        let raw = self.roundtrip_with_retry(method, &body).await?;
        let envelope = codec::decode_envelope(&raw)?;
        if !envelope.is_ok() {
            tracing::debug!(method, status = %envelope.status, "call rejected");
        }
        codec::decode_result(envelope)
    }

    async fn roundtrip_with_retry(&self, method: &str, body: &[u8]) -> Result<Vec<u8>> {
        let mut attempt = 0u32;
        loop {
            match self.transport.roundtrip(method, body).await {
                Ok(raw) => return Ok(raw),
                Err(err) => {
                    let Some(delay) = self.retry.next_delay(attempt) else {
                        return Err(err);
                    };
                    tracing::debug!(method, attempt, error = %err, "transport error, retrying");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// Builder for a [`Caller`].
pub struct CallerBuilder {
    transport: Arc<dyn CallTransport>,
    retry: Option<Arc<dyn RetryPolicy>>,
}

impl CallerBuilder {
    /// Set the retry policy for transport failures.
    pub fn retry(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry = Some(Arc::new(policy));
        self
    }

    /// Build the caller.
    pub fn build(self) -> Caller {
        Caller {
            transport: self.transport,
            retry: self.retry.unwrap_or_else(|| Arc::new(NoRetry)),
        }
    }
}
