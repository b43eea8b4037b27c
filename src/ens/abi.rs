//! Minimal ABI encoding for the two ENS view calls used by the client.

use super::namehash::Node;
use crate::base::address::ADDRESS_LEN;
use crate::base::Address;
use bytes::{BufMut, Bytes, BytesMut};

/// Selector of `resolver(bytes32)` on the ENS registry.
pub const RESOLVER_SELECTOR: [u8; 4] = [0x01, 0x78, 0xb8, 0xbf];

/// Selector of `addr(bytes32)` on a public resolver.
pub const ADDR_SELECTOR: [u8; 4] = [0x3b, 0x3b, 0x57, 0xde];

const WORD: usize = 32;

/// Encodes a call taking a single `bytes32` argument.
pub fn encode_node_call(selector: [u8; 4], node: &Node) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + WORD);
    buf.put_slice(&selector);
    buf.put_slice(node);
    buf.freeze()
}

/// Decodes an `address` return value.
///
/// An empty return (no contract at the target) decodes to the zero address.
pub fn decode_address(data: &[u8]) -> Result<Address, String> {
    if data.is_empty() {
        return Ok(Address::ZERO);
    }
    if data.len() < WORD {
        return Err(format!(
            "malformed address return: {} bytes, expected {}",
            data.len(),
            WORD
        ));
    }
    let (padding, addr) = data[..WORD].split_at(WORD - ADDRESS_LEN);
    if padding.iter().any(|b| *b != 0) {
        return Err("malformed address return: non-zero padding".to_string());
    }
    Ok(Address::from_slice(addr))
}

/// ABI-encodes `addr` as a single return word.
pub fn encode_address(addr: &Address) -> Bytes {
    let mut buf = BytesMut::with_capacity(WORD);
    buf.put_bytes(0, WORD - addr.as_bytes().len());
    buf.put_slice(addr.as_bytes());
    buf.freeze()
}
