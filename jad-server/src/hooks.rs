//! Pre-dispatch hook chain
//!
//! Hooks are ordered gates that run before anything else the dispatcher
//! does: before the method name is even resolved. That ordering is
//! deliberate, so an access-control or rate-limiting hook can reject a
//! request to an unknown target and the caller still sees the hook's
//! message rather than `"no such method"`.
//!
//! A hook either lets the request continue (`Ok`) or vetoes it with an
//! [`ErrorStatus`] whose text becomes the envelope status verbatim. The
//! first veto stops the chain; later hooks and the target method never run.
//!
//! Hooks also get the response sink, so they can leave side effects such as
//! headers on the outgoing response whether or not they veto. The
//! dispatcher does not inspect or restrict this.
//!
//! # Concurrency
//!
//! One chain is shared by every in-flight request. Hooks are stateless from
//! the dispatcher's perspective; a hook that keeps its own state (a rate
//! limiter's counters, say) owns its synchronization.
//!
//! # Examples
//!
//! ```rust
//! use jad_server::{hook_fn, HookChain};
//!
//! let mut chain = HookChain::new();
//! chain.add(hook_fn(|request| {
//!     if request.header("authorization").is_some() {
//!         Ok(())
//!     } else {
//!         Err("unauthorized".into())
//!     }
//! }));
//! ```

use crate::transport::{RawRequest, ResponseSink};
use async_trait::async_trait;
use jad_core::ErrorStatus;
use std::sync::Arc;

/// A pre-dispatch gate
///
/// Must be safe to invoke concurrently from multiple requests.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Inspect a request before routing. Returning an error vetoes the
    /// request; the status text is sent to the caller verbatim.
    async fn check(
        &self,
        request: &RawRequest,
        response: &mut dyn ResponseSink,
    ) -> std::result::Result<(), ErrorStatus>;
}

/// Adapter wrapping a plain function as a [`Hook`]
///
/// Covers the common case of a synchronous check that only needs the
/// request. Hooks that set response headers or await implement the trait
/// directly.
struct FnHook<F>(F);

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&RawRequest) -> std::result::Result<(), ErrorStatus> + Send + Sync,
{
    async fn check(
        &self,
        request: &RawRequest,
        _response: &mut dyn ResponseSink,
    ) -> std::result::Result<(), ErrorStatus> {
        (self.0)(request)
    }
}

/// Wrap a plain function as a [`Hook`].
pub fn hook_fn<F>(f: F) -> Arc<dyn Hook>
where
    F: Fn(&RawRequest) -> std::result::Result<(), ErrorStatus> + Send + Sync + 'static,
{
    Arc::new(FnHook(f))
}

/// Ordered sequence of hooks; registration order is execution order.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to the chain.
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    /// Number of hooks in the chain.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the chain in order. The first veto short-circuits.
    pub async fn run(
        &self,
        request: &RawRequest,
        response: &mut dyn ResponseSink,
    ) -> std::result::Result<(), ErrorStatus> {
        for hook in &self.hooks {
            hook.check(request, response).await?;
        }
        Ok(())
    }
}
