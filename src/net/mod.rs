//! Transport for remote backends.
//!
//! The pipeline for one JSON-RPC request is: host lookup, TCP connect,
//! optional BoringSSL handshake, then a single HTTP/1.1 exchange driven by
//! hyper.

mod connect;
pub mod lookup;
mod rpc;
mod socket;
mod tls;

pub use connect::ConnectJob;
pub use lookup::{HickoryLookup, HostLookup, HostName, LookupKind, SystemLookup};
pub use rpc::{decode_hex, RpcClient, RpcDialer};
pub use socket::RpcStream;
pub use tls::TlsConfig;
