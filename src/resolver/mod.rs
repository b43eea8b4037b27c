//! Name resolution core.
//!
//! A [`Backend`] is one resolution service bound to one remote endpoint.
//! The [`MultiResolver`] owns ordered chains of backends keyed by TLD and
//! resolves a name by trying the backends of the matching chain in push
//! order until one succeeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use name_resolver::ens::EnsClient;
//! use name_resolver::resolver::MultiResolver;
//! use std::sync::Arc;
//!
//! let mr = MultiResolver::new();
//! mr.push_resolver(".eth", Arc::new(EnsClient::new("https://cloudflare-eth.com")))?;
//! mr.connect(".eth").await?;
//! let addr = mr.resolve("nickjohnson.eth").await?;
//! println!("{}", addr);
//! ```

pub mod mock;
mod multi;

pub use multi::{tld_of, validate_tld, MultiResolver, MultiResolverBuilder, DEFAULT_TLD};

use crate::base::{Address, ResolverError};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` returned by [`Backend::connect`].
pub type Connecting<'a> = Pin<Box<dyn Future<Output = Result<(), ResolverError>> + Send + 'a>>;

/// Alias for the `Future` returned by [`Backend::resolve`].
pub type Resolving<'a> = Pin<Box<dyn Future<Output = Result<Address, ResolverError>> + Send + 'a>>;

/// A single pluggable resolution backend.
///
/// Implementations must be thread-safe and use interior mutability for
/// their connection state, so that chains can hand out shared snapshots.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Connects to `endpoint`.
    ///
    /// On success [`is_connected`](Backend::is_connected) returns true and
    /// [`endpoint`](Backend::endpoint) returns `endpoint`. A failed attempt
    /// leaves the backend state untouched.
    fn connect<'a>(&'a self, endpoint: &'a str) -> Connecting<'a>;

    /// The connected endpoint, or the endpoint the backend was built with.
    fn endpoint(&self) -> String;

    fn is_connected(&self) -> bool;

    /// Resolves `name` to an address.
    fn resolve<'a>(&'a self, name: &'a str) -> Resolving<'a>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn connect<'a>(&'a self, endpoint: &'a str) -> Connecting<'a> {
        (**self).connect(endpoint)
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> Resolving<'a> {
        (**self).resolve(name)
    }
}
