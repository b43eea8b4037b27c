//! Ethereum JSON-RPC over HTTP/1.1.

use super::connect::ConnectJob;
use super::lookup::HostLookup;
use super::tls::TlsConfig;
use crate::base::{Address, NetError};
use crate::ens::{Calling, Dial, Dialing, EthCall};
use bytes::Bytes;
use http::{header, Method, Request};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use url::Url;

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one endpoint.
///
/// Every request opens a fresh HTTP/1.1 connection; the hyper connection
/// task is spawned and ends once the response body has been read.
#[derive(Debug)]
pub struct RpcClient {
    url: Url,
    connector: ConnectJob,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Validates `endpoint` without opening a connection.
    pub fn new(endpoint: &str, connector: ConnectJob) -> Result<Self, NetError> {
        let url = Url::parse(endpoint).map_err(|_| NetError::InvalidUrl)?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(NetError::UnknownUrlScheme(other.to_string())),
        }
        if url.host_str().is_none() {
            return Err(NetError::InvalidUrl);
        }
        Ok(Self {
            url,
            connector,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn host_header(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Sends one JSON-RPC request and decodes its `result`.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, NetError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })
        .map_err(|e| NetError::JsonParseError(e.to_string()))?;

        let socket = self.connector.connect(&self.url).await?;
        let (mut sender, conn) = http1::handshake(TokioIo::new(socket))
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "http1 handshake failed");
                NetError::ConnectionFailed
            })?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "rpc connection closed with error");
            }
        });

        let path = match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        };
        let req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::HOST, self.host_header())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|_| NetError::InvalidUrl)?;

        tracing::trace!(method = %method, id = id, url = %self.url, "sending rpc request");
        let resp = sender
            .send_request(req)
            .await
            .map_err(|_| NetError::ConnectionClosed)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NetError::InvalidHttpResponse {
                status: status.as_u16(),
            });
        }

        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|_| NetError::HttpBodyError)?
            .to_bytes();
        let parsed: RpcResponse = serde_json::from_slice(&bytes)
            .map_err(|e| NetError::JsonParseError(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(NetError::RpcError {
                code: err.code,
                message: err.message,
            });
        }
        let result = parsed.result.ok_or(NetError::RpcEmptyResponse)?;
        serde_json::from_value(result).map_err(|e| NetError::JsonParseError(e.to_string()))
    }

    /// `eth_call` against the latest block.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Bytes, NetError> {
        let params = json!([
            { "to": format!("{:#x}", to), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let ret: String = self.request("eth_call", params).await?;
        decode_hex(&ret)
    }
}

/// Decodes a `0x`-prefixed hex string.
pub fn decode_hex(s: &str) -> Result<Bytes, NetError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| NetError::JsonParseError(format!("invalid hex data: {}", e)))
}

impl EthCall for RpcClient {
    fn call(&self, to: Address, data: Bytes) -> Calling<'_> {
        Box::pin(async move { self.eth_call(to, &data).await })
    }
}

/// Default [`Dial`] implementation producing [`RpcClient`]s.
#[derive(Debug, Clone, Default)]
pub struct RpcDialer {
    connector: ConnectJob,
}

impl RpcDialer {
    pub fn new(lookup: Arc<dyn HostLookup>, tls: TlsConfig) -> Self {
        Self {
            connector: ConnectJob::new(lookup, tls),
        }
    }
}

impl Dial for RpcDialer {
    fn dial<'a>(&'a self, endpoint: &'a str) -> Dialing<'a> {
        Box::pin(async move {
            let client = RpcClient::new(endpoint, self.connector.clone())?;
            tracing::debug!(endpoint = %endpoint, "rpc client ready");
            Ok(Arc::new(client) as Arc<dyn EthCall>)
        })
    }
}
