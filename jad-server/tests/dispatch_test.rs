//! End-to-end dispatch tests against an in-memory transport

use jad_core::{
    codec, CallError, Error, ResponseEnvelope, STATUS_BAD_REQUEST, STATUS_BAD_REQUEST_BODY,
    STATUS_CALL_ERROR, STATUS_NO_SUCH_METHOD, STATUS_OK,
};
use jad_server::{BufferSink, Dispatcher, RawRequest};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PingRequest {
    #[serde(rename = "good_id")]
    good_id: i64,
    greetings: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PingReply {
    echo: String,
    num: i64,
}

struct Api;

impl Api {
    async fn ping(self: Arc<Self>, req: PingRequest) -> Result<PingReply, CallError> {
        if req.greetings == "foobar" {
            return Err(CallError::failed("foobar"));
        }
        Ok(PingReply {
            echo: req.greetings,
            num: req.good_id,
        })
    }

    async fn reject(self: Arc<Self>, _req: PingRequest) -> Result<PingReply, CallError> {
        Err(CallError::status("out of stock"))
    }
}

/// Response shape whose serialization always fails, for the committed
/// success path.
struct Opaque;

impl Serialize for Opaque {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(serde::ser::Error::custom("refuses to serialize"))
    }
}

/// Body stream that records whether it was ever polled.
struct TrackingBody {
    polled: Arc<AtomicBool>,
}

impl tokio::io::AsyncRead for TrackingBody {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        self.polled.store(true, Ordering::SeqCst);
        std::task::Poll::Ready(Ok(()))
    }
}

/// Body stream that fails on the first read.
struct FailingBody;

impl tokio::io::AsyncRead for FailingBody {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "connection reset",
        )))
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::builder()
        .service(Arc::new(Api), |scan| {
            scan.unary("Ping", Api::ping);
            scan.unary("Reject", Api::reject);
        })
        .build()
}

async fn roundtrip(dispatcher: &Dispatcher, target: &str, body: &[u8]) -> ResponseEnvelope {
    let mut sink = BufferSink::new();
    dispatcher
        .handle(RawRequest::from_bytes(target, body.to_vec()), &mut sink)
        .await
        .expect("handle should not fail");
    codec::decode_envelope(sink.body()).expect("well-formed envelope")
}

#[tokio::test]
async fn successful_call_returns_the_populated_response() {
    let envelope = roundtrip(
        &dispatcher(),
        "/api/Ping",
        br#"{"good_id":42,"Greetings":"hello, world!"}"#,
    )
    .await;

    assert_eq!(envelope.status, STATUS_OK);
    assert_eq!(
        envelope.result,
        Some(serde_json::json!({"Echo": "hello, world!", "Num": 42}))
    );
}

#[tokio::test]
async fn missing_fields_decode_as_zero_values() {
    let envelope = roundtrip(&dispatcher(), "/api/Ping", br#"{"Greetings":"hi"}"#).await;

    assert_eq!(envelope.status, STATUS_OK);
    assert_eq!(envelope.result, Some(serde_json::json!({"Echo": "hi", "Num": 0})));
}

#[tokio::test]
async fn unknown_target_misses_without_reading_the_body() {
    let polled = Arc::new(AtomicBool::new(false));
    let request = RawRequest::new(
        "/api/Unknown",
        TrackingBody {
            polled: Arc::clone(&polled),
        },
    );

    let mut sink = BufferSink::new();
    dispatcher().handle(request, &mut sink).await.unwrap();

    let envelope = codec::decode_envelope(sink.body()).unwrap();
    assert_eq!(envelope.status, STATUS_NO_SUCH_METHOD);
    assert!(envelope.result.is_none());
    assert!(!polled.load(Ordering::SeqCst), "body must not be read on a miss");
}

#[tokio::test]
async fn malformed_payload_is_a_bad_request() {
    let envelope = roundtrip(&dispatcher(), "/api/Ping", b"+").await;
    assert_eq!(envelope.status, STATUS_BAD_REQUEST);
    assert!(envelope.result.is_none());
}

#[tokio::test]
async fn shape_mismatch_is_a_bad_request() {
    // Valid JSON, wrong field type for the request shape.
    let envelope = roundtrip(&dispatcher(), "/api/Ping", br#"{"Greetings":17}"#).await;
    assert_eq!(envelope.status, STATUS_BAD_REQUEST);
}

#[tokio::test]
async fn body_read_failure_is_a_bad_request_body() {
    let mut sink = BufferSink::new();
    dispatcher()
        .handle(RawRequest::new("/api/Ping", FailingBody), &mut sink)
        .await
        .unwrap();

    let envelope = codec::decode_envelope(sink.body()).unwrap();
    assert_eq!(envelope.status, STATUS_BAD_REQUEST_BODY);
}

#[tokio::test]
async fn plain_method_failure_collapses_to_call_error() {
    // The method's internal message "foobar" must not reach the wire.
    let envelope = roundtrip(&dispatcher(), "/api/Ping", br#"{"Greetings":"foobar"}"#).await;
    assert_eq!(envelope.status, STATUS_CALL_ERROR);
    assert!(envelope.result.is_none());
}

#[tokio::test]
async fn status_carrying_failure_reaches_the_wire_verbatim() {
    let envelope = roundtrip(&dispatcher(), "/api/Reject", b"{}").await;
    assert_eq!(envelope.status, "out of stock");
    assert!(envelope.result.is_none());
}

#[tokio::test]
async fn failing_hook_rejects_every_target_before_routing() {
    let resolved = Arc::new(AtomicBool::new(false));
    let dispatcher = {
        let resolved = Arc::clone(&resolved);
        Dispatcher::builder()
            .hook_fn(|_request| Err("unauthorized".into()))
            .service(Arc::new(Api), |scan| {
                scan.unary("Ping", Api::ping);
            })
            .name_extractor(move |request| {
                resolved.store(true, Ordering::SeqCst);
                jad_server::last_path_segment(request)
            })
            .build()
    };

    for target in ["/api/Ping", "/api/Unknown"] {
        let envelope = roundtrip(&dispatcher, target, b"{}").await;
        assert_eq!(envelope.status, "unauthorized");
        assert!(envelope.result.is_none());
    }
    assert!(
        !resolved.load(Ordering::SeqCst),
        "a hook veto must stop dispatch before name resolution"
    );
}

#[tokio::test]
async fn hook_header_side_effects_survive_a_later_veto() {
    struct TagHook;

    #[async_trait::async_trait]
    impl jad_server::Hook for TagHook {
        async fn check(
            &self,
            _request: &RawRequest,
            response: &mut dyn jad_server::ResponseSink,
        ) -> Result<(), jad_core::ErrorStatus> {
            response.set_header("x-served-by", "jad");
            Ok(())
        }
    }

    let dispatcher = Dispatcher::builder()
        .hook(Arc::new(TagHook))
        .hook_fn(|_request| Err("denied".into()))
        .service(Arc::new(Api), |scan| {
            scan.unary("Ping", Api::ping);
        })
        .build();

    let mut sink = BufferSink::new();
    dispatcher
        .handle(RawRequest::from_bytes("/api/Ping", b"{}".to_vec()), &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.header("x-served-by"), Some("jad"));
    let envelope = codec::decode_envelope(sink.body()).unwrap();
    assert_eq!(envelope.status, "denied");
}

#[tokio::test]
async fn contextual_methods_see_the_transport_request() {
    #[derive(Serialize)]
    struct Inspection {
        method: String,
        raw_len: usize,
        trace: Option<String>,
    }

    let dispatcher = Dispatcher::builder()
        .service(Arc::new(Api), |scan| {
            scan.contextual("Inspect", |_api, _req: PingRequest, ctx| async move {
                Ok::<_, CallError>(Inspection {
                    method: ctx.method().to_string(),
                    raw_len: ctx.raw().len(),
                    trace: ctx.request().header("x-trace-id").map(str::to_string),
                })
            });
        })
        .build();

    let body = br#"{"Greetings":"hi"}"#;
    let request =
        RawRequest::from_bytes("/api/Inspect", body.to_vec()).with_header("x-trace-id", "t-1");
    let mut sink = BufferSink::new();
    dispatcher.handle(request, &mut sink).await.unwrap();

    let envelope = codec::decode_envelope(sink.body()).unwrap();
    assert_eq!(envelope.status, STATUS_OK);
    let result = envelope.result.unwrap();
    assert_eq!(result["method"], "Inspect");
    assert_eq!(result["raw_len"], body.len() as u64);
    assert_eq!(result["trace"], "t-1");
}

#[tokio::test]
async fn unserializable_response_is_fatal_for_the_request() {
    let dispatcher = Dispatcher::builder()
        .service(Arc::new(Api), |scan| {
            scan.unary("Bad", |_api, _req: PingRequest| async { Ok(Opaque) });
        })
        .build();

    let mut sink = BufferSink::new();
    let err = dispatcher
        .handle(RawRequest::from_bytes("/api/Bad", b"{}".to_vec()), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResponseEncode(_)));
    assert!(sink.body().is_empty(), "no envelope after a committed success");
}

#[tokio::test]
async fn concurrent_requests_share_one_dispatcher() {
    let dispatcher = dispatcher();

    let mut handles = Vec::new();
    for i in 0..16i64 {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            let body = format!(r#"{{"good_id":{i},"Greetings":"hi"}}"#);
            let mut sink = BufferSink::new();
            dispatcher
                .handle(RawRequest::from_bytes("/api/Ping", body), &mut sink)
                .await
                .unwrap();
            codec::decode_envelope(sink.body()).unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let envelope = handle.await.unwrap();
        assert_eq!(envelope.status, STATUS_OK);
        assert_eq!(envelope.result.unwrap()["Num"], i as u64);
    }
}
