//! In-memory [`Backend`] for tests and local development.
//!
//! A `MockBackend` never touches the network: its behaviour is supplied as
//! closures, and it counts how often it was called.

use super::{Backend, Connecting, Resolving};
use crate::base::{Address, ResolverError};
use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        PoisonError, RwLock,
    },
};

type ResolveFn = dyn Fn(&str) -> Result<Address, ResolverError> + Send + Sync;
type ConnectFn = dyn Fn(&str) -> Result<(), ResolverError> + Send + Sync;

/// Configurable test double implementing [`Backend`].
///
/// Without a resolve closure every resolution fails with a
/// [`ResolverError::Resolution`]; without a connect closure every connect
/// succeeds.
pub struct MockBackend {
    endpoint: String,
    connected: RwLock<Option<String>>,
    resolve_fn: Option<Box<ResolveFn>>,
    connect_fn: Option<Box<ConnectFn>>,
    resolve_calls: AtomicUsize,
    connect_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// Number of `resolve` calls made so far.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Number of `connect` calls made so far.
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

impl Backend for MockBackend {
    fn connect<'a>(&'a self, endpoint: &'a str) -> Connecting<'a> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.connect_fn {
            Some(f) => f(endpoint),
            None => Ok(()),
        };
        if result.is_ok() {
            *self
                .connected
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(endpoint.to_string());
        }
        Box::pin(std::future::ready(result))
    }

    fn endpoint(&self) -> String {
        self.connected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.endpoint.clone())
    }

    fn is_connected(&self) -> bool {
        self.connected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> Resolving<'a> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.resolve_fn {
            Some(f) => f(name),
            None => Err(ResolverError::resolution(name, "not implemented")),
        };
        Box::pin(std::future::ready(result))
    }
}

impl fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBackend")
            .field("endpoint", &self.endpoint())
            .field("connected", &self.is_connected())
            .field("resolve_calls", &self.resolve_calls())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`MockBackend`].
#[derive(Default)]
pub struct MockBackendBuilder {
    endpoint: String,
    resolve_fn: Option<Box<ResolveFn>>,
    connect_fn: Option<Box<ConnectFn>>,
}

impl MockBackendBuilder {
    /// Endpoint reported before any successful connect.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the resolve behaviour.
    pub fn resolve_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Address, ResolverError> + Send + Sync + 'static,
    {
        self.resolve_fn = Some(Box::new(f));
        self
    }

    /// Resolve every name to `addr`.
    pub fn resolve_to(self, addr: Address) -> Self {
        self.resolve_with(move |_| Ok(addr))
    }

    /// Overrides the connect behaviour.
    pub fn connect_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<(), ResolverError> + Send + Sync + 'static,
    {
        self.connect_fn = Some(Box::new(f));
        self
    }

    /// Every connect attempt fails with a connection error.
    pub fn refuse_connections(self) -> Self {
        self.connect_with(|endpoint| Err(ResolverError::connection(endpoint, "connection refused")))
    }

    pub fn build(self) -> MockBackend {
        MockBackend {
            endpoint: self.endpoint,
            connected: RwLock::new(None),
            resolve_fn: self.resolve_fn,
            connect_fn: self.connect_fn,
            resolve_calls: AtomicUsize::new(0),
            connect_calls: AtomicUsize::new(0),
        }
    }
}
