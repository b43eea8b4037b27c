use thiserror::Error;

/// Errors produced by resolution backends and the multi-resolver.
///
/// The multi-resolver never wraps backend errors: whatever the last backend
/// in a chain returned is handed back to the caller unchanged. Use
/// [`ResolverError::kind`] to classify an error instead of matching on its
/// message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// A TLD key was neither empty nor `.`-prefixed.
    #[error("invalid tld {tld:?}: must be empty or start with '.'")]
    InvalidTld { tld: String },

    /// Pop or resolve against a chain with zero backends.
    #[error("resolver chain is empty")]
    EmptyChain,

    /// A backend could not establish connectivity to its endpoint.
    #[error("connection to {endpoint:?} failed: {reason}")]
    Connection { endpoint: String, reason: String },

    /// A backend could not resolve the given name.
    #[error("name resolution failed for {name:?}: {reason}")]
    Resolution { name: String, reason: String },

    /// No backend in the chain for `tld` could connect.
    #[error("no available backend for tld {tld:?}{}", last_suffix(.last))]
    NoAvailableBackend {
        tld: String,
        last: Option<Box<ResolverError>>,
    },
}

fn last_suffix(last: &Option<Box<ResolverError>>) -> String {
    match last {
        Some(err) => format!(": {}", err),
        None => String::new(),
    }
}

/// Closed classification of [`ResolverError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidTld,
    EmptyChain,
    Connection,
    Resolution,
    NoAvailableBackend,
}

impl ResolverError {
    pub fn invalid_tld(tld: impl Into<String>) -> Self {
        ResolverError::InvalidTld { tld: tld.into() }
    }

    pub fn connection(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        ResolverError::Connection {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn resolution(name: impl Into<String>, reason: impl ToString) -> Self {
        ResolverError::Resolution {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolverError::InvalidTld { .. } => ErrorKind::InvalidTld,
            ResolverError::EmptyChain => ErrorKind::EmptyChain,
            ResolverError::Connection { .. } => ErrorKind::Connection,
            ResolverError::Resolution { .. } => ErrorKind::Resolution,
            ResolverError::NoAvailableBackend { .. } => ErrorKind::NoAvailableBackend,
        }
    }

    /// Returns true if this error is of the given kind.
    #[inline]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}
