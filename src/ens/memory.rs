//! In-memory ENS deployment for tests and offline use.

use super::abi::{self, ADDR_SELECTOR, RESOLVER_SELECTOR};
use super::namehash::{namehash, normalize, Node};
use super::transport::{Calling, Dial, Dialing, EthCall};
use super::ENS_REGISTRY;
use crate::base::{Address, NetError};
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// Address the in-memory public resolver is deployed at.
pub const PUBLIC_RESOLVER: Address = Address::new([
    0x42, 0x97, 0x6b, 0x7f, 0x6a, 0x1e, 0x38, 0x70, 0x90, 0x2a, 0x1d, 0x3c, 0x27, 0x07, 0x1d, 0x7c,
    0x63, 0x46, 0x7a, 0x01,
]);

/// A fake chain answering the ENS registry and public resolver calls.
///
/// Implements both [`Dial`] and [`EthCall`]; every dial returns a handle to
/// the same shared state.
#[derive(Debug, Clone)]
pub struct MemoryChain {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    registry: Address,
    deployed: AtomicBool,
    offline: AtomicBool,
    resolvers: DashMap<Node, Address>,
    addrs: DashMap<(Address, Node), Address>,
    calls: AtomicUsize,
    dials: AtomicUsize,
}

impl Default for MemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChain {
    /// A chain with the registry deployed at the mainnet address and
    /// `resolver.eth` pointing at [`PUBLIC_RESOLVER`].
    pub fn new() -> Self {
        Self::with_registry(ENS_REGISTRY)
    }

    pub fn with_registry(registry: Address) -> Self {
        let chain = Self {
            inner: Arc::new(Inner {
                registry,
                deployed: AtomicBool::new(true),
                offline: AtomicBool::new(false),
                resolvers: DashMap::new(),
                addrs: DashMap::new(),
                calls: AtomicUsize::new(0),
                dials: AtomicUsize::new(0),
            }),
        };
        chain
            .inner
            .resolvers
            .insert(namehash("resolver.eth"), PUBLIC_RESOLVER);
        chain
    }

    /// Removes the registry, as on a network without ENS.
    pub fn undeploy(&self) {
        self.inner.deployed.store(false, Ordering::SeqCst);
    }

    /// While offline every dial and call fails with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Points `name` at the public resolver and sets its address record.
    pub fn set_address(&self, name: &str, addr: Address) {
        let node = node_of(name);
        self.inner.resolvers.insert(node, PUBLIC_RESOLVER);
        self.inner.addrs.insert((PUBLIC_RESOLVER, node), addr);
    }

    /// Points `name` at the public resolver without an address record.
    pub fn set_resolver_only(&self, name: &str) {
        let node = node_of(name);
        self.inner.resolvers.insert(node, PUBLIC_RESOLVER);
        self.inner.addrs.remove(&(PUBLIC_RESOLVER, node));
    }

    /// Number of contract calls served.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Number of dials accepted or refused.
    pub fn dials(&self) -> usize {
        self.inner.dials.load(Ordering::SeqCst)
    }

    fn answer(&self, to: Address, data: &[u8]) -> Bytes {
        if data.len() != 36 {
            return Bytes::new();
        }
        let mut node = [0u8; 32];
        node.copy_from_slice(&data[4..]);

        if to == self.inner.registry && data[..4] == RESOLVER_SELECTOR {
            if !self.inner.deployed.load(Ordering::SeqCst) {
                return Bytes::new();
            }
            let resolver = self
                .inner
                .resolvers
                .get(&node)
                .map(|r| *r.value())
                .unwrap_or(Address::ZERO);
            return abi::encode_address(&resolver);
        }
        if to == PUBLIC_RESOLVER && data[..4] == ADDR_SELECTOR {
            let addr = self
                .inner
                .addrs
                .get(&(to, node))
                .map(|a| *a.value())
                .unwrap_or(Address::ZERO);
            return abi::encode_address(&addr);
        }
        Bytes::new()
    }
}

fn node_of(name: &str) -> Node {
    namehash(&normalize(name).unwrap_or_default())
}

impl EthCall for MemoryChain {
    fn call(&self, to: Address, data: Bytes) -> Calling<'_> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.inner.offline.load(Ordering::SeqCst) {
            Err(NetError::ConnectionFailed)
        } else {
            Ok(self.answer(to, &data))
        };
        Box::pin(std::future::ready(result))
    }
}

impl Dial for MemoryChain {
    fn dial<'a>(&'a self, _endpoint: &'a str) -> Dialing<'a> {
        self.inner.dials.fetch_add(1, Ordering::SeqCst);
        let result: Result<Arc<dyn EthCall>, NetError> =
            if self.inner.offline.load(Ordering::SeqCst) {
                Err(NetError::ConnectionFailed)
            } else {
                Ok(Arc::new(self.clone()))
            };
        Box::pin(std::future::ready(result))
    }
}
