//! Host name lookup.
//!
//! Two interchangeable implementations sit behind [`HostLookup`]:
//! - [`SystemLookup`]: `getaddrinfo` on the blocking thread pool
//! - [`HickoryLookup`]: fully async hickory-dns, reading the system config
//!
//! The JSON-RPC transport uses whichever the configuration selects.

mod hickory;
mod system;

pub use hickory::HickoryLookup;
pub use system::SystemLookup;

use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future, net::SocketAddr, pin::Pin, str::FromStr, sync::Arc};

/// A host name to look up.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct HostName {
    host: Box<str>,
}

impl HostName {
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for HostName {
    fn from(value: &str) -> Self {
        HostName::new(value)
    }
}

impl fmt::Debug for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Looked-up addresses. Ports are always 0.
pub type Addrs = Vec<SocketAddr>;

/// Alias for the `Future` returned by [`HostLookup::lookup`].
pub type Lookup = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Resolves host names to IP addresses.
///
/// An empty result is reported as an error, never as `Ok(vec![])`.
pub trait HostLookup: Send + Sync + fmt::Debug {
    fn lookup(&self, host: HostName) -> Lookup;
}

impl<L: HostLookup + ?Sized> HostLookup for Arc<L> {
    fn lookup(&self, host: HostName) -> Lookup {
        (**self).lookup(host)
    }
}

/// Selects a [`HostLookup`] implementation by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    #[default]
    System,
    Hickory,
}

impl LookupKind {
    pub fn build(self) -> Arc<dyn HostLookup> {
        match self {
            LookupKind::System => Arc::new(SystemLookup::new()),
            LookupKind::Hickory => Arc::new(HickoryLookup::new()),
        }
    }
}

impl FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(LookupKind::System),
            "hickory" => Ok(LookupKind::Hickory),
            other => Err(format!("unknown dns lookup {:?}", other)),
        }
    }
}
