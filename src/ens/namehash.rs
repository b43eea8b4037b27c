//! EIP-137 name normalisation and hashing.

use sha3::{Digest, Keccak256};

/// A 32-byte ENS node identifier.
pub type Node = [u8; 32];

/// Normalises an ENS name for hashing.
///
/// Surrounding whitespace is trimmed, ASCII letters are lowercased and a
/// single trailing `.` is dropped. Names with empty labels (`a..eth`,
/// `.eth`) are rejected.
pub fn normalize(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() {
        return Err("empty name");
    }
    if name.split('.').any(str::is_empty) {
        return Err("empty label in name");
    }
    Ok(name.to_ascii_lowercase())
}

/// Computes the EIP-137 namehash of an already normalised name.
///
/// The empty name hashes to the zero node.
pub fn namehash(name: &str) -> Node {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = Keccak256::digest(label.as_bytes());
        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node.copy_from_slice(&hasher.finalize());
    }
    node
}
