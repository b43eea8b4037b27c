//! Listener loop for the HTTP API.
//!
//! The server accepts connections until the first shutdown signal, then asks
//! every open connection to finish its in-flight request and close. Draining
//! is bounded by a timeout, and a second signal aborts it.

use crate::api::Api;
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{convert::Infallible, io, net::SocketAddr, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
    task::JoinSet,
};

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = ":8080";

/// Default time allowed for open connections to drain.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("graceful shutdown timed out after {0:?}")]
    ShutdownTimedOut(Duration),
    #[error("graceful shutdown aborted")]
    ShutdownAborted,
}

/// Expands the `:port` shorthand to all interfaces.
pub fn listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

pub struct Server {
    listener: TcpListener,
    api: Arc<Api>,
    shutdown_timeout: Duration,
}

impl Server {
    pub async fn bind(addr: &str, api: Api) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(listen_addr(addr))
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            listener,
            api: Arc::new(api),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        })
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until the first message on `signals`, then drains.
    ///
    /// A closed channel also stops the server. Draining fails if it outlasts
    /// the shutdown timeout or if a second message arrives first.
    pub async fn run(self, mut signals: mpsc::Receiver<()>) -> Result<(), ServerError> {
        let (close_tx, close_rx) = watch::channel(false);
        let mut conns = JoinSet::new();

        match self.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "api server listening"),
            Err(e) => tracing::warn!(error = %e, "api server listening on unknown address"),
        }

        loop {
            tokio::select! {
                _ = signals.recv() => break,
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let api = self.api.clone();
                    let mut close_rx = close_rx.clone();
                    conns.spawn(async move {
                        let service = service_fn(move |req| {
                            let api = api.clone();
                            async move { Ok::<_, Infallible>(api.handle(req).await) }
                        });
                        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                        let mut conn = std::pin::pin!(conn);

                        let result = tokio::select! {
                            res = conn.as_mut() => res,
                            _ = close_rx.changed() => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };
                        if let Err(e) = result {
                            tracing::debug!(peer = %peer, error = %e, "connection error");
                        }
                    });
                }
                // Reap finished connections.
                Some(_) = conns.join_next(), if !conns.is_empty() => {}
            }
        }

        tracing::info!(open = conns.len(), "shutting down api server");
        drop(self.listener);
        let _ = close_tx.send(true);

        let drain = async {
            while conns.join_next().await.is_some() {}
        };
        tokio::select! {
            _ = drain => {
                tracing::info!("api server stopped");
                Ok(())
            }
            _ = tokio::time::sleep(self.shutdown_timeout) => {
                tracing::error!(timeout = ?self.shutdown_timeout, "graceful shutdown timed out");
                Err(ServerError::ShutdownTimedOut(self.shutdown_timeout))
            }
            Some(()) = signals.recv() => {
                tracing::warn!("second signal received, aborting shutdown");
                Err(ServerError::ShutdownAborted)
            }
        }
    }
}
