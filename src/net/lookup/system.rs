//! System lookup using getaddrinfo.

use super::{Addrs, HostLookup, HostName, Lookup};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::{io, net::ToSocketAddrs};

/// System resolver running `getaddrinfo` in `spawn_blocking`.
///
/// Honours `/etc/hosts` and the platform resolver configuration.
#[derive(Clone, Debug, Default)]
pub struct SystemLookup;

impl SystemLookup {
    pub fn new() -> Self {
        Self
    }
}

impl HostLookup for SystemLookup {
    fn lookup(&self, host: HostName) -> Lookup {
        Box::pin(async move {
            let domain = host.as_str().to_string();
            let query = domain.clone();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %query, "looking up via getaddrinfo");
                (query.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Addrs>())
            })
            .await;

            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "lookup task failed");
                    NetError::NameNotResolved
                })?
                .dns_context(&domain)?;

            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    &domain,
                    io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
                ));
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "lookup complete");
            Ok(addrs)
        })
    }
}
