//! Error context helpers.
//!
//! [`IoResultExt`] attaches the host or domain to socket and lookup failures
//! in the `net` layer. [`BackendResultExt`] lifts any failure into a
//! [`ResolverError`] carrying the endpoint or name it concerns.

use crate::base::error::ResolverError;
use crate::base::neterror::NetError;
use std::{fmt, io};

pub trait IoResultExt<T> {
    /// Wraps the error as [`NetError::ConnectionFailedTo`].
    ///
    /// ```ignore
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("cloudflare-eth.com", 443)?;
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Wraps the error as [`NetError::NameNotResolvedFor`].
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}

/// Converts backend-internal failures into [`ResolverError`]s.
pub trait BackendResultExt<T> {
    /// Failure while connecting to `endpoint`.
    fn on_connect(self, endpoint: &str) -> Result<T, ResolverError>;

    /// Failure while resolving `name`.
    fn on_resolve(self, name: &str) -> Result<T, ResolverError>;
}

impl<T, E: fmt::Display> BackendResultExt<T> for Result<T, E> {
    fn on_connect(self, endpoint: &str) -> Result<T, ResolverError> {
        self.map_err(|e| ResolverError::connection(endpoint, e))
    }

    fn on_resolve(self, name: &str) -> Result<T, ResolverError> {
        self.map_err(|e| ResolverError::resolution(name, e))
    }
}
