//! HTTP API of the resolver service.
//!
//! | route              | response                                  |
//! |--------------------|-------------------------------------------|
//! | `GET /`            | `Name resolver` banner                    |
//! | `GET /robots.txt`  | disallow-all robots file                  |
//! | `GET /resolve/{n}` | `{"name": n, "address": "0x..."}`         |
//!
//! Errors are JSON `{"code", "message"}` bodies.

pub mod jsonhttp;

use crate::base::{Address, ErrorKind, ResolverError};
use crate::resolver::MultiResolver;
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};

pub const ROOT_BODY: &str = "Name resolver\n";
pub const ROBOTS_BODY: &str = "User-agent: *\nDisallow: /";

/// Successful `/resolve/{name}` body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveResponse {
    pub name: String,
    pub address: Address,
}

/// Maps a resolution error to its HTTP status.
pub fn status_for(err: &ResolverError) -> StatusCode {
    match err.kind() {
        ErrorKind::InvalidTld => StatusCode::BAD_REQUEST,
        ErrorKind::EmptyChain | ErrorKind::Resolution => StatusCode::NOT_FOUND,
        ErrorKind::Connection => StatusCode::BAD_GATEWAY,
        ErrorKind::NoAvailableBackend => StatusCode::SERVICE_UNAVAILABLE,
    }
}

enum Route<'a> {
    Root,
    Robots,
    Resolve(&'a str),
}

fn route(path: &str) -> Option<Route<'_>> {
    match path {
        "/" => Some(Route::Root),
        "/robots.txt" => Some(Route::Robots),
        _ => path
            .strip_prefix("/resolve/")
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(Route::Resolve),
    }
}

/// Request handler shared by all connections.
#[derive(Debug, Clone)]
pub struct Api {
    resolver: Arc<MultiResolver>,
}

impl Api {
    pub fn new(resolver: Arc<MultiResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<MultiResolver> {
        &self.resolver
    }

    /// Handles one request and writes the access log line.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let resp = self.dispatch(&method, &path).await;

        tracing::info!(
            method = %method,
            path = %path,
            status = resp.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "api access"
        );
        resp
    }

    async fn dispatch(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        let Some(route) = route(path) else {
            return jsonhttp::error(StatusCode::NOT_FOUND, None);
        };
        if method != Method::GET {
            let mut resp = jsonhttp::error(StatusCode::METHOD_NOT_ALLOWED, None);
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET"));
            return resp;
        }

        match route {
            Route::Root => jsonhttp::text(StatusCode::OK, ROOT_BODY),
            Route::Robots => jsonhttp::text(StatusCode::OK, ROBOTS_BODY),
            Route::Resolve(raw) => match percent_decode_str(raw).decode_utf8() {
                Ok(name) => self.resolve(&name).await,
                Err(e) => jsonhttp::error(
                    StatusCode::BAD_REQUEST,
                    Some(format!("invalid name encoding: {}", e)),
                ),
            },
        }
    }

    async fn resolve(&self, name: &str) -> Response<Full<Bytes>> {
        match self.resolver.resolve(name).await {
            Ok(address) => jsonhttp::json(
                StatusCode::OK,
                &ResolveResponse {
                    name: name.to_string(),
                    address,
                },
            ),
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "resolve request failed");
                jsonhttp::error(status_for(&e), Some(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ResolverError::invalid_tld("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&ResolverError::EmptyChain), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&ResolverError::resolution("a.eth", "no address set")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ResolverError::connection("http://node", "refused")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ResolverError::NoAvailableBackend {
                tld: ".eth".into(),
                last: None
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_routes() {
        assert!(matches!(route("/"), Some(Route::Root)));
        assert!(matches!(route("/robots.txt"), Some(Route::Robots)));
        assert!(matches!(route("/resolve/foo.eth"), Some(Route::Resolve("foo.eth"))));
        assert!(route("/resolve/").is_none());
        assert!(route("/resolve/a/b").is_none());
        assert!(route("/missing").is_none());
    }

    #[tokio::test]
    async fn test_resolve_name_is_percent_decoded() {
        use crate::resolver::mock::MockBackend;
        use http_body_util::{BodyExt, Empty};

        let resolver = MultiResolver::new();
        resolver
            .push_resolver(
                ".eth",
                Arc::new(
                    MockBackend::builder()
                        .resolve_with(|name| match name {
                            "café.eth" => Ok(Address::new([0xcf; 20])),
                            _ => Err(ResolverError::resolution(name, "no address set")),
                        })
                        .build(),
                ),
            )
            .unwrap();
        let api = Api::new(Arc::new(resolver));

        let get = |path: &'static str| {
            Request::get(path).body(Empty::<Bytes>::new()).unwrap()
        };

        let resp = api.handle(get("/resolve/caf%C3%A9.eth")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let parsed: ResolveResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.name, "café.eth");
        assert_eq!(parsed.address, Address::new([0xcf; 20]));

        let resp = api.handle(get("/resolve/caf%FF.eth")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
