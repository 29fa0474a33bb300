//! jad - JSON API Dispatch
//!
//! jad exposes the public methods of a plain Rust service object as remotely
//! callable JSON operations over any request/response transport, without
//! hand-written routing code. This is the convenience crate re-exporting the
//! jad sub-crates; depend on it when you want a single dependency for both
//! sides.
//!
//! # Architecture
//!
//! - **jad-core**: wire envelope, status taxonomy, errors, codec
//! - **jad-server**: method registry, hook chain, dispatch engine, transport
//!   boundary
//! - **jad-client**: typed caller over a pluggable transport, with retries
//!
//! # Quick start - server side
//!
//! ```rust
//! use std::sync::Arc;
//! use jad::core::CallError;
//! use jad::server::{BufferSink, Dispatcher, RawRequest};
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
//! # async fn main() -> jad::core::Result<()> {
//! let dispatcher = Dispatcher::builder()
//!     .service(Arc::new(Api), |scan| {
//!         scan.unary("Ping", Api::ping);
//!     })
//!     .build();
//!
//! // The surrounding transport supplies the request and the sink.
//! let request = RawRequest::from_bytes("/api/Ping", r#"{"Greetings":"hi"}"#);
//! let mut sink = BufferSink::new();
//! dispatcher.handle(request, &mut sink).await?;
//! assert_eq!(sink.body(), br#"{"status":"ok","result":{"Echo":"hi"}}"#);
//! # Ok(())
//! # }
//! ```
//!
//! # Quick start - client side
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jad::client::Caller;
//!
//! # async fn example(transport: Arc<dyn jad::client::CallTransport>) -> jad::core::Result<()> {
//! let caller = Caller::new(transport);
//! let result: serde_json::Value = caller.call("Ping", &serde_json::json!({})).await?;
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs from the sub-crates so everything is reachable
// through the `jad::` prefix
pub use jad_client as client;
pub use jad_core as core;
pub use jad_server as server;

// Convenience re-exports of the most commonly used types
pub use jad_client::Caller;
pub use jad_core::{CallError, Error, ErrorStatus, ResponseEnvelope, Result};
pub use jad_server::Dispatcher;
