//! Configuration file loading and resolver construction.
//!
//! Settings come from, in decreasing precedence: command-line flags,
//! `RESOLVER_*` environment variables, the TOML config file, and built-in
//! defaults. Flags and environment are handled by `clap`; this module owns
//! the file layer and turns the result into a [`MultiResolver`].
//!
//! ```toml
//! address = ":8080"
//! verbosity = "info"
//! force_default = false
//! dns = "system"        # or "hickory"
//! timeout_secs = 10
//!
//! [[backends]]
//! tld = ".eth"
//! endpoint = "https://cloudflare-eth.com"
//! ```

use crate::base::{Address, ResolverError};
use crate::ens::{Dial, EnsClient, DEFAULT_ENDPOINT};
use crate::logging::Verbosity;
use crate::net::{LookupKind, RpcDialer, TlsConfig};
use crate::resolver::MultiResolver;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use thiserror::Error;

/// File name searched for in the config directories.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Kind of backend a `[[backends]]` entry creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Ens,
}

/// One backend pushed onto a resolver chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Chain key; `""` is the default chain.
    #[serde(default)]
    pub tld: String,
    pub endpoint: String,
    #[serde(default)]
    pub kind: BackendKind,
    /// ENS registry override.
    #[serde(default)]
    pub registry: Option<Address>,
}

impl BackendConfig {
    /// The `.eth` ENS backend used when no backends are configured.
    pub fn default_ens() -> Self {
        Self {
            tld: ".eth".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            kind: BackendKind::Ens,
            registry: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub address: Option<String>,
    pub verbosity: Option<Verbosity>,
    pub force_default: bool,
    pub dns: LookupKind,
    pub timeout_secs: Option<u64>,
    pub backends: Vec<BackendConfig>,
}

/// Config files searched when no path is given, in order.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("swarm").join("resolver").join(CONFIG_FILE));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    paths
}

/// Loads the config file.
///
/// An explicit `path` must exist. Without one the [`default_paths`] are
/// tried in order and defaults are used when none exists.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return Config::from_file(path);
    }
    for candidate in default_paths() {
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            return Config::from_file(&candidate);
        }
    }
    Ok(Config::default())
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Configured backends, or the default `.eth` ENS backend.
    pub fn effective_backends(&self) -> Vec<BackendConfig> {
        if self.backends.is_empty() {
            vec![BackendConfig::default_ens()]
        } else {
            self.backends.clone()
        }
    }

    /// Builds a resolver whose ENS backends use JSON-RPC.
    pub fn build_resolver(&self) -> Result<MultiResolver, ConfigError> {
        let dialer = RpcDialer::new(self.dns.build(), TlsConfig::default());
        self.build_resolver_with(Arc::new(dialer))
    }

    /// Builds a resolver whose ENS backends share `dialer`.
    pub fn build_resolver_with(&self, dialer: Arc<dyn Dial>) -> Result<MultiResolver, ConfigError> {
        let resolver = MultiResolver::builder()
            .force_default(self.force_default)
            .build();

        for backend in self.effective_backends() {
            match backend.kind {
                BackendKind::Ens => {
                    let mut builder = EnsClient::builder()
                        .endpoint(&backend.endpoint)
                        .dialer(dialer.clone());
                    if let Some(registry) = backend.registry {
                        builder = builder.registry(registry);
                    }
                    if let Some(timeout) = self.timeout() {
                        builder = builder.timeout(timeout);
                    }
                    resolver.push_resolver(&backend.tld, Arc::new(builder.build()))?;
                }
            }
        }
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            address = "127.0.0.1:9000"
            verbosity = "debug"
            force_default = true
            dns = "hickory"
            timeout_secs = 3

            [[backends]]
            tld = ".eth"
            endpoint = "http://localhost:8545"

            [[backends]]
            endpoint = "http://fallback:8545"
            "#,
        )
        .unwrap();

        assert_eq!(config.address.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(config.verbosity, Some(Verbosity::Debug));
        assert!(config.force_default);
        assert_eq!(config.dns, LookupKind::Hickory);
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1].tld, "");
        assert_eq!(config.backends[1].kind, BackendKind::Ens);
    }

    #[test]
    fn test_rejects_unknown_keys_and_levels() {
        assert!(toml::from_str::<Config>("adress = \":80\"").is_err());
        assert!(toml::from_str::<Config>("verbosity = \"loud\"").is_err());
    }

    #[test]
    fn test_effective_backends_default() {
        let config = Config::default();
        assert_eq!(config.effective_backends(), vec![BackendConfig::default_ens()]);
        assert_eq!(config.effective_backends()[0].endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_build_resolver_rejects_invalid_tld() {
        let config = Config {
            backends: vec![BackendConfig {
                tld: "eth".into(),
                ..BackendConfig::default_ens()
            }],
            ..Config::default()
        };
        assert!(matches!(
            config.build_resolver(),
            Err(ConfigError::Resolver(ResolverError::InvalidTld { .. }))
        ));
    }

    #[test]
    fn test_default_paths_end_with_cwd() {
        let paths = default_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from(CONFIG_FILE)));
    }
}
