//! TLS client configuration for JSON-RPC endpoints.

use crate::base::neterror::NetError;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};

/// TLS settings applied to every HTTPS endpoint.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Lowest and highest protocol version offered.
    pub versions: (SslVersion, SslVersion),
    /// ALPN protocols in preference order.
    pub alpn: Vec<String>,
    /// Verify the peer certificate chain and host name.
    pub verify: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            versions: (SslVersion::TLS1_2, SslVersion::TLS1_3),
            // The transport only speaks HTTP/1.1.
            alpn: vec!["http/1.1".to_string()],
            verify: true,
        }
    }
}

/// Length-prefixed ALPN list as sent in the ClientHello.
fn alpn_wire(protos: &[String]) -> Result<Vec<u8>, NetError> {
    protos.iter().try_fold(Vec::new(), |mut wire, proto| {
        let len = u8::try_from(proto.len())
            .ok()
            .filter(|len| *len > 0)
            .ok_or(NetError::SslProtocolError)?;
        wire.push(len);
        wire.extend_from_slice(proto.as_bytes());
        Ok(wire)
    })
}

impl TlsConfig {
    /// Builds a connector carrying this configuration.
    pub fn connector(&self) -> Result<SslConnector, NetError> {
        let ssl = |_| NetError::SslProtocolError;
        let (min, max) = self.versions;

        let mut builder = SslConnector::builder(SslMethod::tls()).map_err(ssl)?;
        builder.set_min_proto_version(Some(min)).map_err(ssl)?;
        builder.set_max_proto_version(Some(max)).map_err(ssl)?;
        if !self.alpn.is_empty() {
            builder.set_alpn_protos(&alpn_wire(&self.alpn)?).map_err(ssl)?;
        }
        builder.set_verify(match self.verify {
            true => SslVerifyMode::PEER,
            false => SslVerifyMode::NONE,
        });
        Ok(builder.build())
    }

    /// SNI must not be sent for IP literals (RFC 6066).
    pub fn should_set_sni(host: &str) -> bool {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_err()
    }
}
