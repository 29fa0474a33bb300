//! The transport boundary
//!
//! jad does not own a transport. The surrounding layer (an HTTP server, a
//! message broker bridge, a test harness) accepts connections, parses
//! headers, and then hands the engine exactly two things per request: a
//! [`RawRequest`] and somewhere to write the response, a [`ResponseSink`].
//!
//! # What the transport must supply
//!
//! - the request target (a path-like string the name extractor resolves to
//!   a method name)
//! - request headers (consulted by hooks and contextual handlers)
//! - the body as a byte stream; the engine reads it lazily, so an unknown
//!   target never pays for the body
//!
//! # What the transport receives back
//!
//! Exactly one envelope write per handled request, plus any headers hooks
//! set before dispatch. Connection lifecycle, deadlines and cancellation
//! stay on the transport side; a deadline that fires during the body read
//! surfaces here as an I/O error and becomes a `"bad request body"`
//! envelope.

use async_trait::async_trait;
use std::fmt;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// An inbound request as supplied by the surrounding transport
///
/// Holds the routing target, the headers, and the unread body stream. The
/// body is consumed at most once, and only after routing succeeds.
///
/// # Examples
///
/// ```rust
/// use jad_server::RawRequest;
///
/// let request = RawRequest::from_bytes("/api/Ping", r#"{"Greetings":"hi"}"#)
///     .with_header("authorization", "bearer t0ken");
/// assert_eq!(request.target(), "/api/Ping");
/// assert_eq!(request.header("Authorization"), Some("bearer t0ken"));
/// ```
pub struct RawRequest {
    target: String,
    headers: Vec<(String, String)>,
    body: Option<Box<dyn AsyncRead + Send + Sync + Unpin>>,
}

impl RawRequest {
    /// Create a request from a target and a body stream.
    pub fn new(target: impl Into<String>, body: impl AsyncRead + Send + Sync + Unpin + 'static) -> Self {
        Self {
            target: target.into(),
            headers: Vec::new(),
            body: Some(Box::new(body)),
        }
    }

    /// Create a request with an in-memory body. Convenience for tests and
    /// in-process transports.
    pub fn from_bytes(target: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(target, io::Cursor::new(body.into()))
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The request target the name extractor resolves.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Look up a header by name, case-insensitively. Returns the first
    /// match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers in the order the transport supplied them.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Drain the body stream. Called once by the dispatcher after routing.
    pub(crate) async fn read_body(&mut self) -> io::Result<Vec<u8>> {
        let mut body = self
            .body
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "body already consumed"))?;
        let mut buf = Vec::new();
        body.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

impl fmt::Debug for RawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRequest")
            .field("target", &self.target)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Where the engine writes the response
///
/// Implemented by the transport. Hooks may set headers before dispatch
/// reaches a verdict; the engine itself calls [`send`](Self::send) exactly
/// once per handled request with the serialized envelope.
#[async_trait]
pub trait ResponseSink: Send {
    /// Record a header on the outgoing response.
    fn set_header(&mut self, name: &str, value: &str);

    /// Write the serialized response envelope.
    async fn send(&mut self, body: &[u8]) -> io::Result<()>;
}

/// In-memory [`ResponseSink`]
///
/// Collects headers and the envelope bytes. Useful for tests and for
/// in-process transports that bridge a [`Dispatcher`](crate::Dispatcher)
/// directly to a client.
#[derive(Debug, Default)]
pub struct BufferSink {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers set so far.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The envelope bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the sink, returning the envelope bytes.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

#[async_trait]
impl ResponseSink for BufferSink {
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    async fn send(&mut self, body: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_body_drains_the_stream() {
        let mut request = RawRequest::from_bytes("/api/Ping", b"payload".to_vec());
        let body = request.read_body().await.unwrap();
        assert_eq!(body, b"payload");
    }

    #[tokio::test]
    async fn read_body_twice_fails() {
        let mut request = RawRequest::from_bytes("/api/Ping", b"payload".to_vec());
        request.read_body().await.unwrap();
        assert!(request.read_body().await.is_err());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request =
            RawRequest::from_bytes("/x", b"".to_vec()).with_header("X-Trace-Id", "abc123");
        assert_eq!(request.header("x-trace-id"), Some("abc123"));
        assert_eq!(request.header("missing"), None);
    }

    #[tokio::test]
    async fn buffer_sink_records_headers_and_body() {
        let mut sink = BufferSink::new();
        sink.set_header("x-served-by", "jad");
        sink.send(b"{\"status\":\"ok\"}").await.unwrap();
        assert_eq!(sink.header("X-Served-By"), Some("jad"));
        assert_eq!(sink.body(), b"{\"status\":\"ok\"}");
    }
}
