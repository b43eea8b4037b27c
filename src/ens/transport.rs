//! Seams between the ENS client and the chain it talks to.

use crate::base::{Address, NetError};
use bytes::Bytes;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` returned by [`EthCall::call`].
pub type Calling<'a> = Pin<Box<dyn Future<Output = Result<Bytes, NetError>> + Send + 'a>>;

/// Alias for the `Future` returned by [`Dial::dial`].
pub type Dialing<'a> =
    Pin<Box<dyn Future<Output = Result<Arc<dyn EthCall>, NetError>> + Send + 'a>>;

/// Executes read-only contract calls (`eth_call` at the latest block).
pub trait EthCall: Send + Sync + fmt::Debug {
    fn call(&self, to: Address, data: Bytes) -> Calling<'_>;
}

/// Opens an [`EthCall`] transport for an endpoint.
pub trait Dial: Send + Sync + fmt::Debug {
    fn dial<'a>(&'a self, endpoint: &'a str) -> Dialing<'a>;
}

impl<T: EthCall + ?Sized> EthCall for Arc<T> {
    fn call(&self, to: Address, data: Bytes) -> Calling<'_> {
        (**self).call(to, data)
    }
}

impl<D: Dial + ?Sized> Dial for Arc<D> {
    fn dial<'a>(&'a self, endpoint: &'a str) -> Dialing<'a> {
        (**self).dial(endpoint)
    }
}
