use super::abi::{self, ADDR_SELECTOR, RESOLVER_SELECTOR};
use super::namehash::{namehash, normalize, Node};
use super::transport::{Dial, EthCall};
use super::ENS_REGISTRY;
use crate::base::context::BackendResultExt;
use crate::base::{Address, NetError, ResolverError};
use crate::net::RpcDialer;
use crate::resolver::{Backend, Connecting, Resolving};
use std::{
    fmt,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

/// Name looked up on connect to check that ENS is deployed.
const PROBE_NAME: &str = "resolver.eth";

struct Connection {
    endpoint: String,
    caller: Arc<dyn EthCall>,
}

/// ENS resolution backend.
///
/// Resolves `name.eth` style names through the ENS registry of the chain
/// behind an Ethereum JSON-RPC endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use name_resolver::ens::EnsClient;
/// use name_resolver::resolver::Backend;
///
/// let client = EnsClient::new("https://cloudflare-eth.com");
/// client.connect("https://cloudflare-eth.com").await?;
/// let addr = client.resolve("nickjohnson.eth").await?;
/// ```
pub struct EnsClient {
    endpoint: String,
    registry: Address,
    dialer: Arc<dyn Dial>,
    timeout: Option<Duration>,
    conn: RwLock<Option<Connection>>,
}

impl EnsClient {
    /// Creates a client for `endpoint` using the JSON-RPC transport.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder().endpoint(endpoint).build()
    }

    pub fn builder() -> EnsClientBuilder {
        EnsClientBuilder::default()
    }

    /// The registry contract this client queries.
    pub fn registry(&self) -> Address {
        self.registry
    }

    fn caller(&self) -> Option<Arc<dyn EthCall>> {
        self.conn
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.caller.clone())
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, NetError>>,
    ) -> Result<T, NetError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| NetError::ConnectionTimedOut)?,
            None => fut.await,
        }
    }

    /// Asks the registry for the resolver contract of `node`.
    async fn resolver_of(&self, caller: &dyn EthCall, node: &Node) -> Result<Address, NetError> {
        let data = abi::encode_node_call(RESOLVER_SELECTOR, node);
        let ret = self.bounded(caller.call(self.registry, data)).await?;
        abi::decode_address(&ret).map_err(NetError::JsonParseError)
    }

    async fn addr_of(
        &self,
        caller: &dyn EthCall,
        resolver: Address,
        node: &Node,
    ) -> Result<Address, NetError> {
        let data = abi::encode_node_call(ADDR_SELECTOR, node);
        let ret = self.bounded(caller.call(resolver, data)).await?;
        abi::decode_address(&ret).map_err(NetError::JsonParseError)
    }

    async fn do_connect(&self, endpoint: &str) -> Result<(), ResolverError> {
        if endpoint.is_empty() {
            return Err(ResolverError::connection(endpoint, "empty endpoint"));
        }

        let caller = self
            .bounded(self.dialer.dial(endpoint))
            .await
            .on_connect(endpoint)?;

        let public = self
            .resolver_of(caller.as_ref(), &namehash(PROBE_NAME))
            .await
            .on_connect(endpoint)?;
        if public.is_zero() {
            tracing::debug!(endpoint = %endpoint, registry = %self.registry, "registry probe returned zero");
            return Err(ResolverError::connection(endpoint, "ENS registry not found"));
        }

        *self.conn.write().unwrap_or_else(PoisonError::into_inner) = Some(Connection {
            endpoint: endpoint.to_string(),
            caller,
        });
        tracing::debug!(endpoint = %endpoint, "ENS client connected");
        Ok(())
    }

    async fn do_resolve(&self, name: &str) -> Result<Address, ResolverError> {
        let normalized = normalize(name).on_resolve(name)?;
        let caller = self
            .caller()
            .ok_or_else(|| ResolverError::resolution(name, "not connected"))?;
        let node = namehash(&normalized);

        let resolver = self
            .resolver_of(caller.as_ref(), &node)
            .await
            .on_resolve(name)?;
        if resolver.is_zero() {
            return Err(ResolverError::resolution(name, "no resolver set"));
        }

        let addr = self
            .addr_of(caller.as_ref(), resolver, &node)
            .await
            .on_resolve(name)?;
        if addr.is_zero() {
            return Err(ResolverError::resolution(name, "no address set"));
        }

        tracing::trace!(name = %normalized, resolver = %resolver, address = %addr, "ENS lookup complete");
        Ok(addr)
    }
}

impl Backend for EnsClient {
    fn connect<'a>(&'a self, endpoint: &'a str) -> Connecting<'a> {
        Box::pin(self.do_connect(endpoint))
    }

    fn endpoint(&self) -> String {
        self.conn
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.endpoint.clone())
            .unwrap_or_else(|| self.endpoint.clone())
    }

    fn is_connected(&self) -> bool {
        self.conn
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> Resolving<'a> {
        Box::pin(self.do_resolve(name))
    }
}

impl fmt::Debug for EnsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnsClient")
            .field("endpoint", &self.endpoint())
            .field("registry", &self.registry)
            .field("connected", &self.is_connected())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for an [`EnsClient`].
#[derive(Debug, Default)]
pub struct EnsClientBuilder {
    endpoint: String,
    registry: Option<Address>,
    dialer: Option<Arc<dyn Dial>>,
    timeout: Option<Duration>,
}

impl EnsClientBuilder {
    /// Endpoint used by [`MultiResolver::connect`](crate::resolver::MultiResolver::connect).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the registry address, for chains other than mainnet.
    pub fn registry(mut self, registry: Address) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the JSON-RPC transport.
    pub fn dialer(mut self, dialer: Arc<dyn Dial>) -> Self {
        self.dialer = Some(dialer);
        self
    }

    /// Deadline applied to the dial and to every contract call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> EnsClient {
        EnsClient {
            endpoint: self.endpoint,
            registry: self.registry.unwrap_or(ENS_REGISTRY),
            dialer: self
                .dialer
                .unwrap_or_else(|| Arc::new(RpcDialer::default())),
            timeout: self.timeout,
            conn: RwLock::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ErrorKind;
    use crate::ens::memory::MemoryChain;

    const NICK: &str = "0xb8c2C29ee19D8307cb7255e1Cd9CbDE883A267d5";

    fn client(chain: &MemoryChain) -> EnsClient {
        EnsClient::builder()
            .endpoint("memory://chain")
            .dialer(Arc::new(chain.clone()))
            .build()
    }

    #[tokio::test]
    async fn test_resolve_before_connect() {
        let chain = MemoryChain::new();
        let ens = client(&chain);
        let err = ens.resolve("nickjohnson.eth").await.unwrap_err();
        assert_eq!(err, ResolverError::resolution("nickjohnson.eth", "not connected"));
        assert_eq!(chain.calls(), 0);
    }

    #[tokio::test]
    async fn test_connect_and_resolve() {
        let chain = MemoryChain::new();
        chain.set_address("nickjohnson.eth", NICK.parse().unwrap());
        let ens = client(&chain);

        assert_eq!(ens.endpoint(), "memory://chain");
        ens.connect("memory://other").await.unwrap();
        assert!(ens.is_connected());
        assert_eq!(ens.endpoint(), "memory://other");

        let addr = ens.resolve("NickJohnson.eth.").await.unwrap();
        assert_eq!(addr.to_string(), NICK);
    }

    #[tokio::test]
    async fn test_connect_without_registry() {
        let chain = MemoryChain::new();
        chain.undeploy();
        let ens = client(&chain);

        let err = ens.connect("memory://chain").await.unwrap_err();
        assert_eq!(
            err,
            ResolverError::connection("memory://chain", "ENS registry not found")
        );
        assert!(!ens.is_connected());
    }

    #[tokio::test]
    async fn test_connect_empty_endpoint() {
        let chain = MemoryChain::new();
        let err = client(&chain).connect("").await.unwrap_err();
        assert!(err.is(ErrorKind::Connection));
        assert_eq!(chain.dials(), 0);
    }

    #[tokio::test]
    async fn test_failed_reconnect_keeps_previous_connection() {
        let chain = MemoryChain::new();
        chain.set_address("foo.eth", Address::new([7; 20]));
        let ens = client(&chain);
        ens.connect("memory://first").await.unwrap();

        chain.set_offline(true);
        assert!(ens.connect("memory://second").await.is_err());
        assert_eq!(ens.endpoint(), "memory://first");

        chain.set_offline(false);
        assert_eq!(ens.resolve("foo.eth").await.unwrap(), Address::new([7; 20]));
    }

    #[tokio::test]
    async fn test_missing_records() {
        let chain = MemoryChain::new();
        chain.set_resolver_only("noaddr.eth");
        let ens = client(&chain);
        ens.connect("memory://chain").await.unwrap();

        assert_eq!(
            ens.resolve("unknown.eth").await.unwrap_err(),
            ResolverError::resolution("unknown.eth", "no resolver set")
        );
        assert_eq!(
            ens.resolve("noaddr.eth").await.unwrap_err(),
            ResolverError::resolution("noaddr.eth", "no address set")
        );
        assert!(ens.resolve("").await.unwrap_err().is(ErrorKind::Resolution));
    }

    #[tokio::test]
    async fn test_transport_error_during_resolve() {
        let chain = MemoryChain::new();
        let ens = client(&chain);
        ens.connect("memory://chain").await.unwrap();

        chain.set_offline(true);
        let err = ens.resolve("foo.eth").await.unwrap_err();
        assert!(err.is(ErrorKind::Resolution));
    }
}
