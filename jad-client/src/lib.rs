//! Typed caller for jad services
//!
//! The server side of jad answers every call with a uniform JSON envelope.
//! This crate is the matching caller: give it a transport that can carry
//! bytes to a method name, and it gives you typed calls with envelope
//! decoding and transport-failure retries.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use jad_client::{Caller, FixedDelay};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct PingArgs { greetings: String }
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct PingReply { echo: String }
//!
//! # async fn example(transport: Arc<dyn jad_client::CallTransport>) -> jad_core::Result<()> {
//! let caller = Caller::builder(transport)
//!     .retry(FixedDelay::new(10, Duration::ZERO))
//!     .build();
//!
//! let reply: PingReply = caller
//!     .call("Ping", &PingArgs { greetings: "hi".into() })
//!     .await?;
//! assert_eq!(reply.echo, "hi");
//! # Ok(())
//! # }
//! ```
//!
//! # Error classes
//!
//! - transport failures retry per the [`RetryPolicy`], then surface as
//!   [`Error::Transport`](jad_core::Error::Transport)
//! - a non-`"ok"` envelope surfaces as
//!   [`Error::Rejected`](jad_core::Error::Rejected) carrying the status
//!   text exactly as the server sent it, and is never retried

mod caller;
mod retry;

pub use caller::{CallTransport, Caller, CallerBuilder};
pub use retry::{FixedDelay, NoRetry, RetryPolicy};
