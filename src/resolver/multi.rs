//! Per-TLD resolver chains with ordered fallback.

use super::Backend;
use crate::base::{Address, ResolverError};
use dashmap::DashMap;
use std::{fmt, sync::Arc};

/// Key of the default chain.
pub const DEFAULT_TLD: &str = "";

type Chain = Vec<Arc<dyn Backend>>;

/// Checks that `tld` is either the default key or starts with `.`.
pub fn validate_tld(tld: &str) -> Result<(), ResolverError> {
    if tld.is_empty() || tld.starts_with('.') {
        Ok(())
    } else {
        Err(ResolverError::invalid_tld(tld))
    }
}

/// Returns the TLD of `name`: the suffix starting at its last `.`, or the
/// default key when `name` contains no `.`.
///
/// A bare key such as `.tld` is its own suffix.
pub fn tld_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => DEFAULT_TLD,
    }
}

/// Registry of resolver chains keyed by TLD.
///
/// Chains are created lazily on the first push for a TLD. Popping the last
/// backend leaves the chain registered but empty: such a chain fails
/// resolution with [`ResolverError::EmptyChain`] instead of falling back to
/// the default chain. Only names whose TLD was never registered fall back
/// to the default chain.
///
/// The registry may be shared across tasks. Resolution takes a snapshot of
/// the selected chain and releases the registry before any backend call.
pub struct MultiResolver {
    chains: DashMap<String, Chain>,
    force_default: bool,
}

impl Default for MultiResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiResolver {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
            force_default: false,
        }
    }

    pub fn builder() -> MultiResolverBuilder {
        MultiResolverBuilder::default()
    }

    /// Returns true if every name is routed to the default chain.
    pub fn force_default(&self) -> bool {
        self.force_default
    }

    /// Appends `backend` to the chain for `tld`.
    pub fn push_resolver(&self, tld: &str, backend: Arc<dyn Backend>) -> Result<(), ResolverError> {
        validate_tld(tld)?;
        tracing::debug!(tld = %tld, endpoint = %backend.endpoint(), "pushing resolver");
        self.chains.entry(tld.to_string()).or_default().push(backend);
        Ok(())
    }

    /// Removes and returns the most recently pushed backend for `tld`.
    pub fn pop_resolver(&self, tld: &str) -> Result<Arc<dyn Backend>, ResolverError> {
        validate_tld(tld)?;
        let popped = self
            .chains
            .get_mut(tld)
            .and_then(|mut chain| chain.pop())
            .ok_or(ResolverError::EmptyChain)?;
        tracing::debug!(tld = %tld, endpoint = %popped.endpoint(), "popped resolver");
        Ok(popped)
    }

    /// Number of backends currently registered for `tld`.
    pub fn chain_count(&self, tld: &str) -> usize {
        self.chains.get(tld).map(|chain| chain.len()).unwrap_or(0)
    }

    /// Snapshot of the chain for `tld`, in push order.
    pub fn get_chain(&self, tld: &str) -> Vec<Arc<dyn Backend>> {
        self.chains
            .get(tld)
            .map(|chain| chain.value().clone())
            .unwrap_or_default()
    }

    /// Returns true if a chain was ever created for `tld`, even if it has
    /// since been emptied.
    pub fn is_registered(&self, tld: &str) -> bool {
        self.chains.contains_key(tld)
    }

    /// All registered TLD keys, sorted.
    pub fn tlds(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self.chains.iter().map(|e| e.key().clone()).collect();
        tlds.sort();
        tlds
    }

    /// Selects the chain `name` resolves against.
    fn select_chain(&self, name: &str) -> (String, Chain) {
        let tld = if self.force_default {
            DEFAULT_TLD
        } else {
            tld_of(name)
        };

        if let Some(chain) = self.chains.get(tld) {
            return (tld.to_string(), chain.value().clone());
        }
        (DEFAULT_TLD.to_string(), self.get_chain(DEFAULT_TLD))
    }

    /// Resolves `name` against the chain selected by its TLD.
    ///
    /// Backends are tried strictly in push order, each exactly once. The
    /// first success is returned; if every backend fails, the error of the
    /// last one is returned unchanged.
    pub async fn resolve(&self, name: &str) -> Result<Address, ResolverError> {
        let (tld, chain) = self.select_chain(name);
        if chain.is_empty() {
            tracing::debug!(name = %name, tld = %tld, "resolver chain is empty");
            return Err(ResolverError::EmptyChain);
        }

        let mut last_err = ResolverError::EmptyChain;
        for (idx, backend) in chain.iter().enumerate() {
            match backend.resolve(name).await {
                Ok(addr) => {
                    tracing::debug!(
                        name = %name,
                        tld = %tld,
                        index = idx,
                        address = %addr,
                        "name resolved"
                    );
                    return Ok(addr);
                }
                Err(e) => {
                    tracing::debug!(
                        name = %name,
                        tld = %tld,
                        index = idx,
                        error = %e,
                        "backend failed to resolve, trying next"
                    );
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    /// Connects the first backend in the chain for `tld` that accepts a
    /// connection to its own endpoint, and returns it.
    pub async fn connect(&self, tld: &str) -> Result<Arc<dyn Backend>, ResolverError> {
        validate_tld(tld)?;

        let mut last = None;
        for backend in self.get_chain(tld) {
            let endpoint = backend.endpoint();
            match backend.connect(&endpoint).await {
                Ok(()) => {
                    tracing::info!(tld = %tld, endpoint = %endpoint, "backend connected");
                    return Ok(backend);
                }
                Err(e) => {
                    tracing::warn!(tld = %tld, endpoint = %endpoint, error = %e, "backend failed to connect");
                    last = Some(Box::new(e));
                }
            }
        }

        Err(ResolverError::NoAvailableBackend {
            tld: tld.to_string(),
            last,
        })
    }
}

impl fmt::Debug for MultiResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiResolver")
            .field("tlds", &self.tlds())
            .field("force_default", &self.force_default)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`MultiResolver`].
#[derive(Debug, Default)]
pub struct MultiResolverBuilder {
    force_default: bool,
}

impl MultiResolverBuilder {
    /// Route every name to the default chain regardless of its TLD.
    pub fn force_default(mut self, force: bool) -> Self {
        self.force_default = force;
        self
    }

    pub fn build(self) -> MultiResolver {
        MultiResolver {
            chains: DashMap::new(),
            force_default: self.force_default,
        }
    }
}
