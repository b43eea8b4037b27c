//! Byte stream carrying JSON-RPC requests.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_boring::SslStream;

/// Connection to an RPC endpoint: plain for `http`, TLS for `https`.
#[derive(Debug)]
pub enum RpcStream {
    Plain(TcpStream),
    Tls(SslStream<TcpStream>),
}

impl RpcStream {
    pub fn is_tls(&self) -> bool {
        matches!(self, RpcStream::Tls(_))
    }

    /// ALPN protocol chosen by the server.
    pub fn alpn(&self) -> Option<&[u8]> {
        match self {
            RpcStream::Plain(_) => None,
            RpcStream::Tls(tls) => tls.ssl().selected_alpn_protocol(),
        }
    }

    pub fn peer_addr(&self) -> io::Result<std::net::SocketAddr> {
        match self {
            RpcStream::Plain(tcp) => tcp.peer_addr(),
            RpcStream::Tls(tls) => tls.get_ref().peer_addr(),
        }
    }
}

impl AsyncRead for RpcStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            RpcStream::Plain(tcp) => Pin::new(tcp).poll_read(cx, buf),
            RpcStream::Tls(tls) => Pin::new(tls).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for RpcStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            RpcStream::Plain(tcp) => Pin::new(tcp).poll_write(cx, buf),
            RpcStream::Tls(tls) => Pin::new(tls).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            RpcStream::Plain(tcp) => Pin::new(tcp).poll_flush(cx),
            RpcStream::Tls(tls) => Pin::new(tls).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            RpcStream::Plain(tcp) => Pin::new(tcp).poll_shutdown(cx),
            RpcStream::Tls(tls) => Pin::new(tls).poll_shutdown(cx),
        }
    }
}
