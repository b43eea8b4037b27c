//! Base types and error handling.
//!
//! Provides the foundational types shared by every layer:
//! - [`Address`]: the 20-byte identifier a name resolves to
//! - [`ResolverError`]: resolution-level errors surfaced by backends and the
//!   multi-resolver, with a closed [`ErrorKind`] classification
//! - [`NetError`]: transport errors raised by the `net` layer

pub mod address;
pub mod context;
pub mod error;
pub mod neterror;

pub use address::{Address, AddressParseError};
pub use error::{ErrorKind, ResolverError};
pub use neterror::NetError;
