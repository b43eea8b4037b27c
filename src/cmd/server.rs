//! `resolver`: the name resolution service.

use crate::api::Api;
use crate::config::{self, Config};
use crate::logging::{self, Verbosity};
use crate::resolver::{Backend, MultiResolver};
use crate::server::{Server, DEFAULT_ADDRESS};
use crate::version::VERSION;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{io::Write, path::PathBuf, sync::Arc};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "resolver", version = VERSION, about = "Name resolution service")]
pub struct ServerCli {
    /// Configuration file path
    #[arg(long, global = true, env = "RESOLVER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Subcommand, Debug)]
pub enum ServerCommand {
    /// Start the name resolution server
    #[command(long_about = "Start the name resolution server.\n\n\
        The server listens on the configured address. The log verbosity can be\n\
        given as a number or a name:\n  \
        0: silent\n  1: error\n  2: warn\n  3: info (default)\n  4: debug\n  5: trace")]
    Start(StartArgs),
    /// Print the version
    Version,
}

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Address for the server to listen on [default: :8080]
    #[arg(long, env = "RESOLVER_ADDRESS")]
    pub address: Option<String>,

    /// Log verbosity level [default: info]
    #[arg(short = 'v', long, env = "RESOLVER_VERBOSITY")]
    pub verbosity: Option<Verbosity>,
}

/// Effective `start` settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSettings {
    pub address: String,
    pub verbosity: Verbosity,
}

impl StartSettings {
    pub fn resolve(args: &StartArgs, config: &Config) -> Self {
        Self {
            address: args
                .address
                .clone()
                .or_else(|| config.address.clone())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            verbosity: args.verbosity.or(config.verbosity).unwrap_or_default(),
        }
    }
}

/// Connects every backend of every registered chain once.
///
/// Each backend needs its own connection for the chain to fall back past
/// it. Failures are logged, not fatal.
pub async fn connect_all(resolver: &MultiResolver) {
    for tld in resolver.tlds() {
        let mut connected = 0;
        for backend in resolver.get_chain(&tld) {
            let endpoint = backend.endpoint();
            match backend.connect(&endpoint).await {
                Ok(()) => connected += 1,
                Err(e) => {
                    tracing::warn!(tld = %tld, endpoint = %endpoint, error = %e, "backend not connected")
                }
            }
        }
        if connected == 0 {
            tracing::warn!(tld = %tld, "no backend connected");
        } else {
            tracing::debug!(tld = %tld, connected, "chain connected");
        }
    }
}

/// Forwards SIGINT and SIGTERM into `tx` until the receiver goes away.
async fn forward_signals(tx: mpsc::Sender<()>) {
    #[cfg(unix)]
    let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(|e| tracing::warn!(error = %e, "cannot listen for SIGTERM"))
        .ok();

    loop {
        #[cfg(unix)]
        let received = match term.as_mut() {
            Some(term) => tokio::select! {
                res = tokio::signal::ctrl_c() => res.is_ok(),
                _ = term.recv() => true,
            },
            None => tokio::signal::ctrl_c().await.is_ok(),
        };
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.is_ok();

        if !received {
            tracing::warn!("cannot listen for interrupts");
            std::future::pending::<()>().await;
        }
        tracing::debug!("received shutdown signal");
        if tx.send(()).await.is_err() {
            break;
        }
    }
}

async fn start(args: StartArgs, config: Config) -> Result<()> {
    let settings = StartSettings::resolve(&args, &config);
    logging::init(settings.verbosity);

    let resolver = Arc::new(config.build_resolver().context("failed to build resolver")?);
    connect_all(&resolver).await;

    let server = Server::bind(&settings.address, Api::new(resolver)).await?;
    let (tx, rx) = mpsc::channel(2);
    tokio::spawn(forward_signals(tx));

    server.run(rx).await?;
    Ok(())
}

pub async fn run(cli: ServerCli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        ServerCommand::Version => crate::cmd::print_version(out)?,
        ServerCommand::Start(args) => {
            let config = config::load(cli.config.as_deref())?;
            start(args, config).await?;
        }
    }
    Ok(())
}
