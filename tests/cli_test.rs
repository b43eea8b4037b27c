//! Command-Line Tests
//!
//! Exercises the `resolver-cli` resolve path and the server startup helpers
//! against in-memory ENS chains.

use clap::Parser;
use name_resolver::base::{Address, ErrorKind, ResolverError};
use name_resolver::cmd::client::{self, resolve_name, ClientCli, ClientCommand};
use name_resolver::cmd::server::{connect_all, ServerCli, ServerCommand};
use name_resolver::config::Config;
use name_resolver::ens::memory::MemoryChain;
use name_resolver::ens::EnsClient;
use name_resolver::resolver::{Backend, MultiResolver};
use std::sync::Arc;

const NICK: &str = "0xb8c2C29ee19D8307cb7255e1Cd9CbDE883A267d5";

fn resolver_on(chain: &MemoryChain) -> MultiResolver {
    Config::default()
        .build_resolver_with(Arc::new(chain.clone()))
        .unwrap()
}

#[tokio::test]
async fn test_resolve_name() {
    let chain = MemoryChain::new();
    chain.set_address("nickjohnson.eth", NICK.parse().unwrap());

    let addr = resolve_name(&resolver_on(&chain), "nickjohnson.eth")
        .await
        .unwrap();
    assert_eq!(addr.to_string(), NICK);
}

#[tokio::test]
async fn test_resolve_name_is_case_insensitive() {
    let chain = MemoryChain::new();
    chain.set_address("nickjohnson.eth", NICK.parse().unwrap());

    let addr = resolve_name(&resolver_on(&chain), "NickJohnson.eth")
        .await
        .unwrap();
    assert_eq!(addr.to_string(), NICK);
}

#[tokio::test]
async fn test_resolve_name_without_address_record() {
    let chain = MemoryChain::new();
    chain.set_resolver_only("empty.eth");

    let err = resolve_name(&resolver_on(&chain), "empty.eth")
        .await
        .unwrap_err();
    let err = err.downcast::<ResolverError>().unwrap();
    assert_eq!(err, ResolverError::resolution("empty.eth", "no address set"));
}

#[tokio::test]
async fn test_invalid_name_sends_nothing() {
    let chain = MemoryChain::new();
    let err = resolve_name(&resolver_on(&chain), "example.com")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not a valid ENS name"));
    assert_eq!(chain.dials(), 0);
    assert_eq!(chain.calls(), 0);
}

#[tokio::test]
async fn test_offline_chain_reports_no_backend() {
    let chain = MemoryChain::new();
    chain.set_offline(true);

    let err = resolve_name(&resolver_on(&chain), "nickjohnson.eth")
        .await
        .unwrap_err();
    let err = err.downcast::<ResolverError>().unwrap();
    assert!(err.is(ErrorKind::NoAvailableBackend));
}

#[tokio::test]
async fn test_connect_all_connects_every_chain() {
    let up = MemoryChain::new();
    let down = MemoryChain::new();
    down.set_offline(true);

    let eth = Arc::new(EnsClient::builder().endpoint("up").dialer(Arc::new(up)).build());
    let test = Arc::new(
        EnsClient::builder()
            .endpoint("down")
            .dialer(Arc::new(down))
            .build(),
    );
    let mr = MultiResolver::new();
    mr.push_resolver(".eth", eth.clone()).unwrap();
    mr.push_resolver(".test", test.clone()).unwrap();

    connect_all(&mr).await;
    assert!(eth.is_connected());
    assert!(!test.is_connected());
}

#[tokio::test]
async fn test_cli_version_and_parsing() {
    let cli = ClientCli::try_parse_from(["resolver-cli", "--version"]);
    assert!(cli.is_err());

    let cli = ClientCli::try_parse_from(["resolver-cli", "resolve", "a.eth", "--config", "x.toml"])
        .unwrap();
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
    assert!(matches!(cli.command, ClientCommand::Resolve { .. }));

    let mut out = Vec::new();
    client::run(
        ClientCli::try_parse_from(["resolver-cli", "version"]).unwrap(),
        &mut out,
    )
    .await
    .unwrap();
    assert!(!out.is_empty());
}

#[test]
fn test_server_cli_parsing() {
    let cli = ServerCli::try_parse_from(["resolver", "start", "-v", "debug"]).unwrap();
    assert!(matches!(cli.command, ServerCommand::Start(_)));
    assert!(ServerCli::try_parse_from(["resolver"]).is_err());
    assert!(ServerCli::try_parse_from(["resolver", "start", "extra"]).is_err());
}

#[tokio::test]
async fn test_connect_all_lets_chain_fall_back() {
    let primary = MemoryChain::new();
    let secondary = MemoryChain::new();
    primary.set_address("foo.eth", Address::new([0xaa; 20]));
    secondary.set_address("foo.eth", Address::new([0xbb; 20]));

    let a = Arc::new(
        EnsClient::builder()
            .endpoint("primary")
            .dialer(Arc::new(primary.clone()))
            .build(),
    );
    let b = Arc::new(
        EnsClient::builder()
            .endpoint("secondary")
            .dialer(Arc::new(secondary))
            .build(),
    );
    let mr = MultiResolver::new();
    mr.push_resolver(".eth", a.clone()).unwrap();
    mr.push_resolver(".eth", b.clone()).unwrap();

    connect_all(&mr).await;
    assert!(a.is_connected());
    assert!(b.is_connected());
    assert_eq!(mr.resolve("foo.eth").await.unwrap(), Address::new([0xaa; 20]));

    primary.set_offline(true);
    assert_eq!(mr.resolve("foo.eth").await.unwrap(), Address::new([0xbb; 20]));
}
