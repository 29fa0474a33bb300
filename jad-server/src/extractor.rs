//! Name extraction
//!
//! The dispatcher does not know any routing convention; a pluggable
//! extractor maps the incoming request to a method name. The default,
//! [`last_path_segment`], treats the final segment of the request target as
//! the method identifier, so `/api/v1/Ping` dispatches to `Ping`.

use crate::transport::RawRequest;
use std::sync::Arc;

/// Maps an incoming request to a target method name.
pub type NameExtractor = Arc<dyn Fn(&RawRequest) -> String + Send + Sync>;

/// The default extraction convention: the last path segment of the request
/// target, with any query or fragment stripped.
pub fn last_path_segment(request: &RawRequest) -> String {
    let target = request.target();
    let path = target.split(&['?', '#'][..]).next().unwrap_or(target);
    path.rsplit('/').next().unwrap_or(path).to_string()
}
