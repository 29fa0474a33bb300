//! The request dispatch pipeline
//!
//! [`Dispatcher::handle`] turns one inbound transport request into exactly
//! one response envelope (or, on the single unrecoverable path, an error
//! returned to the transport). The steps run in a fixed order:
//!
//! 1. the hook chain; a veto writes the hook's message as the status
//! 2. name resolution via the pluggable extractor
//! 3. registry lookup; a miss writes `"no such method"` and, importantly,
//!    happens before the body is read, so unknown targets never pay for
//!    body I/O
//! 4. body read; failure writes `"bad request body"`
//! 5. payload parse and typed decode; failure writes `"bad request"`
//! 6. invocation; a status-carrying error writes its text verbatim, a
//!    plain failure writes `"call error"` with the detail kept server-side
//! 7. success writes `{"status":"ok","result":...}`
//!
//! Hooks run before routing so a policy rejection for an unknown target
//! still reports the hook's message rather than `"no such method"`.
//!
//! # The unrecoverable path
//!
//! If the response shape fails to serialize after the method succeeded, the
//! dispatcher has already committed to a success response and no status
//! envelope can honestly describe the outcome. `handle` returns
//! [`Error::ResponseEncode`] and writes nothing; the transport owns the
//! connection's fate. This is fatal for that one request only and must
//! never take the process down.
//!
//! # Concurrency
//!
//! A `Dispatcher` is immutable after [`build`](DispatcherBuilder::build)
//! and cheap to clone; the surrounding transport typically clones it into
//! each connection task and calls `handle` concurrently.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use jad_core::CallError;
//! use jad_server::{BufferSink, Dispatcher, RawRequest};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default, rename_all = "PascalCase")]
//! struct PingRequest { greetings: String }
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct PingReply { echo: String }
//!
//! struct Api;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> jad_core::Result<()> {
//! let dispatcher = Dispatcher::builder()
//!     .service(Arc::new(Api), |scan| {
//!         scan.unary("Ping", |_api, req: PingRequest| async move {
//!             Ok::<_, CallError>(PingReply { echo: req.greetings })
//!         });
//!     })
//!     .build();
//!
//! let request = RawRequest::from_bytes("/api/Ping", r#"{"Greetings":"hi"}"#);
//! let mut sink = BufferSink::new();
//! dispatcher.handle(request, &mut sink).await?;
//! assert_eq!(sink.body(), br#"{"status":"ok","result":{"Echo":"hi"}}"#);
//! # Ok(())
//! # }
//! ```

use crate::context::CallContext;
use crate::descriptor::InvokeError;
use crate::extractor::{last_path_segment, NameExtractor};
use crate::hooks::{hook_fn, Hook, HookChain};
use crate::registry::{MethodRegistry, ServiceScan};
use crate::transport::{RawRequest, ResponseSink};
use jad_core::{
    CallError, Error, ErrorStatus, ResponseEnvelope, Result, STATUS_BAD_REQUEST,
    STATUS_BAD_REQUEST_BODY, STATUS_CALL_ERROR, STATUS_NO_SUCH_METHOD,
};
use serde_json::Value;
use std::sync::Arc;

/// Routes, decodes, invokes and encodes one request at a time
///
/// Built once via [`Dispatcher::builder`]; the registry is sealed at build
/// time and never mutated mid-dispatch.
#[derive(Clone)]
pub struct Dispatcher {
    registry: MethodRegistry,
    hooks: HookChain,
    extract: NameExtractor,
}

impl Dispatcher {
    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// The sealed method registry.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Handle one inbound request, writing exactly one envelope to the
    /// sink.
    ///
    /// # Errors
    ///
    /// Every recoverable failure becomes a status envelope and `Ok(())`.
    /// The only `Err` is [`Error::ResponseEncode`]: the response shape
    /// refused to serialize after the method already succeeded.
    pub async fn handle(
        &self,
        request: RawRequest,
        response: &mut dyn ResponseSink,
    ) -> Result<()> {
        // Hooks come first, before a method name even exists.
        if let Err(status) = self.hooks.run(&request, response).await {
            tracing::debug!(status = %status, "request vetoed by hook");
            return write_status(response, status.as_str()).await;
        }

        // Route before reading the body: an unknown target costs nothing.
        let name = (*self.extract)(&request);
        let Some(method) = self.registry.get(&name) else {
            tracing::debug!(method = %name, "no such method");
            return write_status(response, STATUS_NO_SUCH_METHOD).await;
        };

        let mut request = request;
        let raw = match request.read_body().await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(method = %name, error = %err, "failed to read request body");
                return write_status(response, STATUS_BAD_REQUEST_BODY).await;
            }
        };

        let args: Value = match serde_json::from_slice(&raw) {
            Ok(args) => args,
            Err(err) => {
                tracing::warn!(method = %name, error = %err, "request payload is not valid JSON");
                return write_status(response, STATUS_BAD_REQUEST).await;
            }
        };

        let ctx = CallContext::new(name.clone(), raw, args, request);
        match method.invoke(ctx).await {
            Ok(result) => write_ok(response, result).await,
            Err(InvokeError::Decode(err)) => {
                tracing::warn!(
                    method = %name,
                    shape = method.request_shape(),
                    error = %err,
                    "payload does not match the request shape"
                );
                write_status(response, STATUS_BAD_REQUEST).await
            }
            Err(InvokeError::Call(CallError::Status(status))) => {
                tracing::debug!(method = %name, status = %status, "method supplied its own status");
                write_status(response, status.as_str()).await
            }
            Err(InvokeError::Call(CallError::Failed(detail))) => {
                // The detail stays in the log; the wire only sees "call error".
                tracing::warn!(method = %name, error = %detail, "method call failed");
                write_status(response, STATUS_CALL_ERROR).await
            }
            Err(InvokeError::Encode(err)) => {
                // Success was already committed; no envelope can describe this.
                tracing::error!(
                    method = %name,
                    shape = method.response_shape(),
                    error = %err,
                    "response shape failed to encode"
                );
                Err(Error::ResponseEncode(err.to_string()))
            }
        }
    }
}

/// Builder for a [`Dispatcher`]
///
/// Registration happens here, before serving: once `build` returns, the
/// registry cannot change.
pub struct DispatcherBuilder {
    registry: MethodRegistry,
    hooks: HookChain,
    extract: Option<NameExtractor>,
}

impl DispatcherBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            registry: MethodRegistry::new(),
            hooks: HookChain::new(),
            extract: None,
        }
    }

    /// Append a hook. Hooks execute in the order they are added.
    pub fn hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.add(hook);
        self
    }

    /// Append a plain-function hook.
    pub fn hook_fn<F>(self, f: F) -> Self
    where
        F: Fn(&RawRequest) -> std::result::Result<(), ErrorStatus> + Send + Sync + 'static,
    {
        self.hook(hook_fn(f))
    }

    /// Register a service's methods via a capability scan.
    pub fn service<S>(
        mut self,
        service: Arc<S>,
        expose: impl FnOnce(&mut ServiceScan<'_, S>),
    ) -> Self
    where
        S: Send + Sync + 'static,
    {
        self.registry.register(service, expose);
        self
    }

    /// Replace the registry wholesale. Useful when one registry is shared
    /// by several dispatchers.
    pub fn registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the name extractor. Defaults to
    /// [`last_path_segment`](crate::last_path_segment).
    pub fn name_extractor<F>(mut self, extract: F) -> Self
    where
        F: Fn(&RawRequest) -> String + Send + Sync + 'static,
    {
        self.extract = Some(Arc::new(extract));
        self
    }

    /// Seal the registry and produce the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
            hooks: self.hooks,
            extract: self.extract.unwrap_or_else(|| Arc::new(last_path_segment)),
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_ok(response: &mut dyn ResponseSink, result: Value) -> Result<()> {
    let body = serde_json::to_vec(&ResponseEnvelope::ok(result))
        .map_err(|e| Error::ResponseEncode(e.to_string()))?;
    if let Err(err) = response.send(&body).await {
        tracing::warn!(error = %err, "failed to write response envelope");
    }
    Ok(())
}

async fn write_status(response: &mut dyn ResponseSink, status: &str) -> Result<()> {
    match serde_json::to_vec(&ResponseEnvelope::status(status)) {
        Ok(body) => {
            if let Err(err) = response.send(&body).await {
                tracing::warn!(status = %status, error = %err, "failed to write status envelope");
            }
        }
        Err(err) => {
            // A bare status envelope cannot fail to encode.
            tracing::error!(status = %status, error = %err, "failed to encode status envelope");
        }
    }
    Ok(())
}
