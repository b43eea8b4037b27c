use super::lookup::{HostLookup, HostName, SystemLookup};
use super::socket::RpcStream;
use super::tls::TlsConfig;
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tokio::net::TcpStream;
use url::{Host, Url};

/// Opens connections to an endpoint: lookup, then TCP, then TLS for `https`.
#[derive(Clone)]
pub struct ConnectJob {
    lookup: Arc<dyn HostLookup>,
    tls: TlsConfig,
}

impl Default for ConnectJob {
    fn default() -> Self {
        Self::new(Arc::new(SystemLookup::new()), TlsConfig::default())
    }
}

impl ConnectJob {
    pub fn new(lookup: Arc<dyn HostLookup>, tls: TlsConfig) -> Self {
        Self { lookup, tls }
    }

    /// Candidate socket addresses for `url`. IP literals skip the lookup.
    async fn addrs(&self, url: &Url, port: u16) -> Result<Vec<SocketAddr>, NetError> {
        let ip = match url.host().ok_or(NetError::InvalidUrl)? {
            Host::Ipv4(ip) => IpAddr::V4(ip),
            Host::Ipv6(ip) => IpAddr::V6(ip),
            Host::Domain(domain) => {
                let addrs = self.lookup.lookup(HostName::new(domain)).await?;
                return Ok(addrs
                    .into_iter()
                    .map(|a| SocketAddr::new(a.ip(), port))
                    .collect());
            }
        };
        Ok(vec![SocketAddr::new(ip, port)])
    }

    pub async fn connect(&self, url: &Url) -> Result<RpcStream, NetError> {
        let tls = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(NetError::UnknownUrlScheme(other.to_string())),
        };
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        let mut last_err = NetError::ConnectionFailed;
        let mut stream = None;
        for addr in self.addrs(url, port).await? {
            match TcpStream::connect(addr).await.connection_context(host, port) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(addr = %addr, error = %e, "tcp connect failed");
                    last_err = e;
                }
            }
        }
        let stream = stream.ok_or(last_err)?;
        let _ = stream.set_nodelay(true);

        if !tls {
            return Ok(RpcStream::Plain(stream));
        }

        let mut config = self
            .tls
            .connector()?
            .configure()
            .map_err(|_| NetError::SslProtocolError)?;
        let domain = host.trim_start_matches('[').trim_end_matches(']');
        if !TlsConfig::should_set_sni(domain) {
            config.set_use_server_name_indication(false);
        }
        let tls_stream = tokio_boring::connect(config, domain, stream)
            .await
            .map_err(|e| {
                tracing::debug!(host = %host, error = %e, "TLS handshake failed");
                NetError::SslProtocolError
            })?;
        Ok(RpcStream::Tls(tls_stream))
    }
}

impl fmt::Debug for ConnectJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectJob")
            .field("lookup", &self.lookup)
            .field("tls", &self.tls)
            .finish()
    }
}
