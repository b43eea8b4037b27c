//! # name_resolver
//!
//! Resolves human-readable names such as `nickjohnson.eth` to 20-byte
//! account addresses through pluggable backends chosen by top-level domain.
//!
//! ## Features
//!
//! - **Multi-resolver**: ordered backend chains per TLD with fallback to a
//!   default chain
//! - **ENS backend**: registry and resolver lookups over Ethereum JSON-RPC,
//!   plain HTTP or BoringSSL
//! - **HTTP service**: `/resolve/{name}` API with graceful shutdown
//! - **CLI**: one-shot resolution from the command line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use name_resolver::ens::EnsClient;
//! use name_resolver::resolver::MultiResolver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mr = MultiResolver::new();
//!     mr.push_resolver(".eth", Arc::new(EnsClient::new("https://cloudflare-eth.com")))?;
//!     mr.connect(".eth").await?;
//!     println!("{}", mr.resolve("nickjohnson.eth").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Addresses and error definitions
//! - [`resolver`] - Backend trait and the multi-resolver
//! - [`ens`] - ENS backend
//! - [`net`] - Lookup, connect and JSON-RPC transport
//! - [`api`] / [`server`] - HTTP service
//! - [`config`], [`logging`], [`cmd`] - binary support

pub mod api;
pub mod base;
pub mod cmd;
pub mod config;
pub mod ens;
pub mod logging;
pub mod net;
pub mod resolver;
pub mod server;
pub mod version;
