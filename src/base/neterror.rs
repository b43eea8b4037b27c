use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Transport errors raised while talking to a remote endpoint.
///
/// Codes follow Chromium's `net_error_list.h` where a matching entry exists;
/// JSON-RPC specific errors use the custom range starting at -900.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name not resolved for {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme: {0}")]
    UnknownUrlScheme(String),
    #[error("Invalid HTTP response: status {status}")]
    InvalidHttpResponse { status: u16 },
    #[error("Failed to read HTTP body")]
    HttpBodyError,

    // JSON-RPC Errors
    #[error("Malformed JSON: {0}")]
    JsonParseError(String),
    #[error("JSON-RPC error {code}: {message}")]
    RpcError { code: i64, message: String },
    #[error("JSON-RPC response carried neither result nor error")]
    RpcEmptyResponse,
}

impl NetError {
    pub fn connection_failed_to(host: &str, port: u16, err: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            source: Arc::new(err),
        }
    }

    pub fn dns_failed(domain: &str, err: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(err),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionFailed => -104,
            NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved => -105,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme(_) => -302,
            NetError::InvalidHttpResponse { .. } => -370,
            NetError::HttpBodyError => -320,

            // Custom codes
            NetError::JsonParseError(_) => -900,
            NetError::RpcError { .. } => -901,
            NetError::RpcEmptyResponse => -902,
        }
    }

    /// Returns true if the error happened before any request reached the peer.
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            NetError::ConnectionFailed
                | NetError::ConnectionFailedTo { .. }
                | NetError::NameNotResolved
                | NetError::NameNotResolvedFor { .. }
                | NetError::SslProtocolError
                | NetError::InvalidUrl
                | NetError::UnknownUrlScheme(_)
        )
    }
}
