//! Method registry and the registration-time capability scan
//!
//! The registry maps method names to [`MethodDescriptor`]s. It is populated
//! once per service at setup time and is read-only from then on; dispatch
//! never mutates it, so concurrent lookups need no locking.
//!
//! # The capability scan
//!
//! A service registers by declaring its candidate methods through a
//! [`ServiceScan`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use jad_core::CallError;
//! use jad_server::MethodRegistry;
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
//! let mut registry = MethodRegistry::new();
//! registry.register(Arc::new(Api), |scan| {
//!     scan.unary("Ping", |_api, req: PingRequest| async move {
//!         Ok::<_, CallError>(PingReply { echo: req.greetings })
//!     });
//! });
//! assert!(registry.has_method("Ping"));
//! ```
//!
//! The scan never fails. Candidates that are not eligible are silently
//! skipped rather than reported:
//!
//! - names that do not begin with an exported-style (uppercase) character
//!   are dropped, as are empty names
//! - shape requirements (a typed, deserializable request; a serializable
//!   response; a single `CallError` return) are carried by the helpers'
//!   trait bounds, so a method that does not match the shape cannot be
//!   declared at all
//!
//! Duplicate names overwrite: the last registration for a name wins,
//! silently. This is documented behavior, not an accident of iteration
//! order.

use crate::descriptor::MethodDescriptor;
use jad_core::CallError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Name to descriptor mapping, built once per service registration
///
/// Cheap to clone: the map lives behind an `Arc` that registration unshares
/// on write. After setup the registry is shared read-only across every
/// in-flight request.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: Arc<HashMap<String, Arc<MethodDescriptor>>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a service's declared methods into the registry.
    ///
    /// Never fails; ineligible candidates are skipped. Registering a
    /// service with zero eligible methods leaves the registry unchanged.
    pub fn register<S>(&mut self, service: Arc<S>, expose: impl FnOnce(&mut ServiceScan<'_, S>))
    where
        S: Send + Sync + 'static,
    {
        let mut scan = ServiceScan {
            registry: self,
            service,
        };
        expose(&mut scan);
    }

    /// Look up a method by name.
    pub fn get(&self, name: &str) -> Option<Arc<MethodDescriptor>> {
        self.methods.get(name).cloned()
    }

    /// Whether a method is registered under this name.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// All registered method names.
    pub fn method_names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the registry holds no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn insert(&mut self, descriptor: MethodDescriptor) {
        let name = descriptor.name().to_string();
        let methods = Arc::make_mut(&mut self.methods);
        if methods.insert(name.clone(), Arc::new(descriptor)).is_some() {
            tracing::debug!(method = %name, "replacing previously registered method");
        }
    }
}

/// Registration-time view of one service
///
/// Created by [`MethodRegistry::register`]; each helper declares one
/// candidate method under one of the supported calling conventions.
pub struct ServiceScan<'a, S> {
    registry: &'a mut MethodRegistry,
    service: Arc<S>,
}

impl<S: Send + Sync + 'static> ServiceScan<'_, S> {
    /// Declare a `(service, request)` method.
    pub fn unary<Req, Resp, F, Fut>(&mut self, name: &str, handler: F) -> &mut Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<S>, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Resp, CallError>> + Send + 'static,
    {
        if !exported(name) {
            tracing::debug!(method = %name, "skipping candidate with non-exported name");
            return self;
        }
        self.registry.insert(MethodDescriptor::unary(
            name,
            Arc::clone(&self.service),
            handler,
        ));
        self
    }

    /// Declare a `(service, request, context)` method.
    pub fn contextual<Req, Resp, F, Fut>(&mut self, name: &str, handler: F) -> &mut Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<S>, Req, crate::CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Resp, CallError>> + Send + 'static,
    {
        if !exported(name) {
            tracing::debug!(method = %name, "skipping candidate with non-exported name");
            return self;
        }
        self.registry.insert(MethodDescriptor::contextual(
            name,
            Arc::clone(&self.service),
            handler,
        ));
        self
    }
}

/// Exported-identifier convention: the name must not begin with a
/// lowercase character. Empty names never qualify.
fn exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_lowercase())
}
