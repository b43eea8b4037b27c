//! Config Loading Tests

use name_resolver::base::{Address, ResolverError};
use name_resolver::config::{self, BackendConfig, Config, ConfigError};
use name_resolver::ens::memory::MemoryChain;
use name_resolver::logging::Verbosity;
use name_resolver::net::LookupKind;
use name_resolver::resolver::Backend;
use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;

const NICK: &str = "0xb8c2C29ee19D8307cb7255e1Cd9CbDE883A267d5";

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        address = ":9090"
        verbosity = "4"
        dns = "hickory"

        [[backends]]
        tld = ".eth"
        endpoint = "http://localhost:8545"
        registry = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
        "#,
    );

    let config = config::load(Some(&path)).unwrap();
    assert_eq!(config.address.as_deref(), Some(":9090"));
    assert_eq!(config.verbosity, Some(Verbosity::Debug));
    assert_eq!(config.dns, LookupKind::Hickory);
    assert_eq!(config.backends.len(), 1);
    assert_eq!(
        config.backends[0].registry,
        Some("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e".parse().unwrap())
    );
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        config::load(Some(&missing)),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "address = [");
    let err = config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"), "{err}");
}

#[test]
fn test_empty_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");
    let config = Config::from_file(Path::new(&path)).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.effective_backends(), vec![BackendConfig::default_ens()]);
}

#[tokio::test]
async fn test_build_resolver_with_memory_chain() {
    let chain = MemoryChain::new();
    chain.set_address("nickjohnson.eth", NICK.parse().unwrap());

    let config: Config = toml::from_str(
        r#"
        [[backends]]
        tld = ".eth"
        endpoint = "memory://primary"

        [[backends]]
        tld = ".eth"
        endpoint = "memory://secondary"
        "#,
    )
    .unwrap();
    let resolver = config.build_resolver_with(Arc::new(chain.clone())).unwrap();
    assert_eq!(resolver.chain_count(".eth"), 2);
    assert!(!resolver.is_registered(""));

    let backend = resolver.connect(".eth").await.unwrap();
    assert_eq!(backend.endpoint(), "memory://primary");
    assert_eq!(chain.dials(), 1);

    let addr = backend.resolve("nickjohnson.eth").await.unwrap();
    assert_eq!(addr.to_string(), NICK);
}

#[tokio::test]
async fn test_registry_override_is_used() {
    let registry = Address::new([0x11; 20]);
    let chain = MemoryChain::with_registry(registry);
    chain.set_address("alice.eth", Address::new([0x22; 20]));

    let mut config = Config {
        backends: vec![BackendConfig::default_ens()],
        ..Config::default()
    };
    let resolver = config.build_resolver_with(Arc::new(chain.clone())).unwrap();
    let err = resolver.connect(".eth").await.unwrap_err();
    assert!(matches!(err, ResolverError::NoAvailableBackend { .. }));

    config.backends[0].registry = Some(registry);
    let resolver = config.build_resolver_with(Arc::new(chain)).unwrap();
    let backend = resolver.connect(".eth").await.unwrap();
    assert_eq!(
        backend.resolve("alice.eth").await.unwrap(),
        Address::new([0x22; 20])
    );
}
