//! Async lookup using hickory-dns.

use super::{Addrs, HostLookup, HostName, Lookup};
use crate::base::neterror::NetError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::{io, net::SocketAddr, sync::LazyLock};

/// Async resolver backed by hickory-dns.
///
/// The underlying resolver is shared by all instances and built lazily on
/// the first query, from the system configuration when it can be read and
/// from hickory's defaults otherwise.
#[derive(Debug, Clone)]
pub struct HickoryLookup {
    resolver: &'static LazyLock<TokioResolver>,
}

impl HickoryLookup {
    pub fn new() -> Self {
        static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => builder,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read system DNS config, using defaults");
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };
            builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4thenIpv6;
            builder.build()
        });

        Self {
            resolver: &RESOLVER,
        }
    }
}

impl Default for HickoryLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl HostLookup for HickoryLookup {
    fn lookup(&self, host: HostName) -> Lookup {
        let resolver = self.resolver;
        Box::pin(async move {
            let domain = host.as_str();
            tracing::debug!(domain = %domain, "looking up via hickory-dns");

            let lookup = resolver.lookup_ip(domain).await.map_err(|e| {
                tracing::debug!(domain = %domain, error = %e, "hickory-dns lookup failed");
                NetError::dns_failed(domain, io::Error::new(io::ErrorKind::NotFound, e.to_string()))
            })?;

            let addrs: Addrs = lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();
            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    domain,
                    io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
                ));
            }
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hickory_lookup_invalid_domain() {
        let err = HickoryLookup::new()
            .lookup(HostName::new("this-domain-definitely-does-not-exist.invalid"))
            .await
            .unwrap_err();
        match err {
            NetError::NameNotResolvedFor { domain, .. } => {
                assert_eq!(domain, "this-domain-definitely-does-not-exist.invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_hickory_lookup_shares_resolver() {
        let a = HickoryLookup::new();
        let b = HickoryLookup::default();
        assert!(std::ptr::eq(a.resolver, b.resolver));
    }
}
