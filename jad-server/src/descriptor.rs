//! Method descriptors and typed invocation wrappers
//!
//! A [`MethodDescriptor`] is the registry's record for one callable target:
//! its name, which calling convention it was registered under, the request
//! and response shapes, and a type-erased invocation thunk bound to the
//! service instance.
//!
//! # Type erasure
//!
//! The registry stores heterogeneous methods in one map, so each typed
//! handler is wrapped into a uniform `Fn(CallContext) -> future` thunk at
//! registration time. Inside the thunk the payload is decoded into the
//! concrete request type, the handler runs, and the response is encoded
//! back to a JSON value. The three failure classes stay distinct on the way
//! out because the dispatcher maps each to a different wire status:
//!
//! - decode failure: the payload does not fit the request shape
//! - call failure: the method itself returned an error
//! - encode failure: the response shape refused to serialize after the
//!   method already succeeded
//!
//! # Why `Pin<Box<dyn Future>>`?
//!
//! Different handlers produce different concrete future types; the map
//! needs one. Boxing is noise next to transport I/O.

use crate::context::CallContext;
use jad_core::CallError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Which calling convention a method was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// `(service, request)`: the method sees only its typed payload.
    Unary,
    /// `(service, request, context)`: the method also receives the
    /// per-request [`CallContext`] carrying the raw transport request.
    Contextual,
}

/// Failure classes an invocation thunk can produce.
#[derive(Debug)]
pub(crate) enum InvokeError {
    /// The payload did not decode into the request shape.
    Decode(serde_json::Error),
    /// The method returned an error.
    Call(CallError),
    /// The response shape did not serialize after a successful call.
    Encode(serde_json::Error),
}

pub(crate) type InvokeFuture =
    Pin<Box<dyn Future<Output = std::result::Result<Value, InvokeError>> + Send>>;

type InvokeFn = dyn Fn(CallContext) -> InvokeFuture + Send + Sync;

/// Registry record for one callable method
///
/// Immutable once created. The thunk holds an `Arc` to the service, so a
/// descriptor keeps its receiver alive for the registry's lifetime.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    kind: HandlerKind,
    request_shape: &'static str,
    response_shape: &'static str,
    invoke: Arc<InvokeFn>,
}

impl MethodDescriptor {
    /// The method's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The calling convention this method uses.
    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Type name of the request shape callers must supply.
    pub fn request_shape(&self) -> &'static str {
        self.request_shape
    }

    /// Type name of the response shape this method produces.
    pub fn response_shape(&self) -> &'static str {
        self.response_shape
    }

    /// Run the bound method against a call context.
    pub(crate) fn invoke(&self, ctx: CallContext) -> InvokeFuture {
        (self.invoke)(ctx)
    }

    /// Wrap a `(service, request)` handler.
    pub(crate) fn unary<S, Req, Resp, F, Fut>(
        name: impl Into<String>,
        service: Arc<S>,
        handler: F,
    ) -> Self
    where
        S: Send + Sync + 'static,
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<S>, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Resp, CallError>> + Send + 'static,
    {
        // Wrap the handler in Arc so each invocation can clone it into its
        // own future.
        let handler = Arc::new(handler);
        let invoke: Arc<InvokeFn> = Arc::new(move |ctx: CallContext| {
            let handler = Arc::clone(&handler);
            let service = Arc::clone(&service);
            Box::pin(async move {
                let request: Req =
                    serde_json::from_value(ctx.args().clone()).map_err(InvokeError::Decode)?;
                let response = (*handler)(service, request)
                    .await
                    .map_err(InvokeError::Call)?;
                serde_json::to_value(response).map_err(InvokeError::Encode)
            })
        });

        Self {
            name: name.into(),
            kind: HandlerKind::Unary,
            request_shape: any::type_name::<Req>(),
            response_shape: any::type_name::<Resp>(),
            invoke,
        }
    }

    /// Wrap a `(service, request, context)` handler.
    pub(crate) fn contextual<S, Req, Resp, F, Fut>(
        name: impl Into<String>,
        service: Arc<S>,
        handler: F,
    ) -> Self
    where
        S: Send + Sync + 'static,
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<S>, Req, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Resp, CallError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let invoke: Arc<InvokeFn> = Arc::new(move |ctx: CallContext| {
            let handler = Arc::clone(&handler);
            let service = Arc::clone(&service);
            Box::pin(async move {
                let request: Req =
                    serde_json::from_value(ctx.args().clone()).map_err(InvokeError::Decode)?;
                let response = (*handler)(service, request, ctx)
                    .await
                    .map_err(InvokeError::Call)?;
                serde_json::to_value(response).map_err(InvokeError::Encode)
            })
        });

        Self {
            name: name.into(),
            kind: HandlerKind::Contextual,
            request_shape: any::type_name::<Req>(),
            response_shape: any::type_name::<Resp>(),
            invoke,
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("request_shape", &self.request_shape)
            .field("response_shape", &self.response_shape)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawRequest;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct EchoRequest {
        text: String,
    }

    #[derive(Serialize)]
    struct EchoReply {
        text: String,
    }

    struct Svc;

    fn ctx_with_args(args: Value) -> CallContext {
        CallContext::new(
            "Echo".to_string(),
            args.to_string().into_bytes(),
            args,
            RawRequest::from_bytes("/Echo", b"".to_vec()),
        )
    }

    #[tokio::test]
    async fn unary_thunk_decodes_invokes_encodes() {
        let descriptor =
            MethodDescriptor::unary("Echo", Arc::new(Svc), |_svc, req: EchoRequest| async move {
                Ok(EchoReply { text: req.text })
            });

        assert_eq!(descriptor.kind(), HandlerKind::Unary);
        assert!(descriptor.request_shape().contains("EchoRequest"));
        assert!(descriptor.response_shape().contains("EchoReply"));

        let result = descriptor
            .invoke(ctx_with_args(serde_json::json!({"text": "hi"})))
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"text": "hi"}));
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_decode_error() {
        let descriptor =
            MethodDescriptor::unary("Echo", Arc::new(Svc), |_svc, req: EchoRequest| async move {
                Ok(EchoReply { text: req.text })
            });

        let err = descriptor
            .invoke(ctx_with_args(serde_json::json!({"text": 42})))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Decode(_)));
    }

    #[tokio::test]
    async fn contextual_thunk_receives_the_context() {
        let descriptor = MethodDescriptor::contextual(
            "Echo",
            Arc::new(Svc),
            |_svc, _req: EchoRequest, ctx: CallContext| async move {
                Ok(EchoReply {
                    text: ctx.method().to_string(),
                })
            },
        );

        assert_eq!(descriptor.kind(), HandlerKind::Contextual);
        let result = descriptor
            .invoke(ctx_with_args(serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"text": "Echo"}));
    }

    #[tokio::test]
    async fn method_error_is_a_call_error() {
        let descriptor =
            MethodDescriptor::unary("Echo", Arc::new(Svc), |_svc, _req: EchoRequest| async move {
                Err::<EchoReply, _>(CallError::failed("boom"))
            });

        let err = descriptor
            .invoke(ctx_with_args(serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Call(CallError::Failed(_))));
    }
}
