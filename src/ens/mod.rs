//! ENS (Ethereum Name Service) backend.
//!
//! [`EnsClient`] implements [`Backend`](crate::resolver::Backend) by issuing
//! two read-only contract calls per name: `resolver(node)` on the registry,
//! then `addr(node)` on the returned resolver. The transport is abstracted
//! behind [`Dial`] and [`EthCall`]; the default is JSON-RPC over HTTP(S)
//! from [`crate::net`], and [`memory::MemoryChain`] serves tests.

pub mod abi;
mod client;
pub mod memory;
pub mod namehash;
mod transport;

pub use client::{EnsClient, EnsClientBuilder};
pub use namehash::{namehash, normalize, Node};
pub use transport::{Calling, Dial, Dialing, EthCall};

use crate::base::Address;

/// Address of the ENS registry on Ethereum mainnet.
pub const ENS_REGISTRY: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97, 0xba,
    0x6c, 0x7d, 0x2e, 0x1e,
]);

/// Default public JSON-RPC endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cloudflare-eth.com";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_address() {
        assert_eq!(
            ENS_REGISTRY.to_string(),
            "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
        );
    }
}
