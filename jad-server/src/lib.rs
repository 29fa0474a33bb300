//! Method registry and JSON dispatch engine
//!
//! This crate turns the public methods of a plain Rust service object into
//! remotely callable JSON operations, without hand-written routing code.
//! A caller supplies a target name and a JSON payload; the engine resolves
//! a matching method, decodes the payload into the method's typed request,
//! invokes it, and serializes its response into the uniform envelope.
//!
//! # Core pieces
//!
//! - **[`MethodRegistry`]**: name to descriptor map, populated once per
//!   service through a registration-time capability scan
//! - **[`MethodDescriptor`]**: immutable record of one callable method and
//!   its typed invocation thunk
//! - **[`HookChain`]**: ordered pre-dispatch gates, each able to veto a
//!   request before routing
//! - **[`Dispatcher`]**: the per-request pipeline; hooks, then routing,
//!   then decode, invoke and encode
//! - **[`RawRequest`] / [`ResponseSink`]**: the transport boundary; the
//!   engine owns nothing below it
//!
//! # Quick start
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
//! impl Api {
//!     async fn ping(self: Arc<Self>, req: PingRequest) -> Result<PingReply, CallError> {
//!         Ok(PingReply { echo: req.greetings })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> jad_core::Result<()> {
//! let dispatcher = Dispatcher::builder()
//!     .hook_fn(|request| match request.header("authorization") {
//!         Some(_) => Ok(()),
//!         None => Err("unauthorized".into()),
//!     })
//!     .service(Arc::new(Api), |scan| {
//!         scan.unary("Ping", Api::ping);
//!     })
//!     .build();
//!
//! let request = RawRequest::from_bytes("/api/Ping", r#"{"Greetings":"hi"}"#)
//!     .with_header("authorization", "bearer t0ken");
//! let mut sink = BufferSink::new();
//! dispatcher.handle(request, &mut sink).await?;
//! assert_eq!(sink.body(), br#"{"status":"ok","result":{"Echo":"hi"}}"#);
//! # Ok(())
//! # }
//! ```
//!
//! # Calling conventions
//!
//! Methods are declared under one of two signatures, selected at
//! registration time:
//!
//! - `unary`: `(service, request) -> Result<response, CallError>`
//! - `contextual`: `(service, request, CallContext) -> Result<response, CallError>`
//!
//! The contextual form additionally receives the per-request
//! [`CallContext`], which carries the resolved method name, the raw body
//! bytes, the decoded payload, and the transport request.
//!
//! # Error taxonomy
//!
//! Every recoverable failure becomes a status envelope with a stable
//! string; see [`jad_core::envelope`] for the table. Methods and hooks can
//! put custom text on the wire through
//! [`ErrorStatus`](jad_core::ErrorStatus); everything else is collapsed to
//! a generic code so internals never leak.

mod context;
mod descriptor;
mod dispatch;
mod extractor;
mod hooks;
mod registry;
mod transport;

pub use context::CallContext;
pub use descriptor::{HandlerKind, MethodDescriptor};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use extractor::{last_path_segment, NameExtractor};
pub use hooks::{hook_fn, Hook, HookChain};
pub use registry::{MethodRegistry, ServiceScan};
pub use transport::{BufferSink, RawRequest, ResponseSink};
