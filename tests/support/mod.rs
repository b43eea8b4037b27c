//! Fake Ethereum JSON-RPC node for integration tests.
#![allow(dead_code)]

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use name_resolver::base::Address;
use name_resolver::ens::memory::MemoryChain;
use name_resolver::ens::EthCall;
use name_resolver::net::decode_hex;
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// How the fake node answers.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Serve `eth_call` from an in-memory chain.
    Chain(MemoryChain),
    /// Answer every call with a JSON-RPC error object.
    RpcError,
    /// Answer every request with this HTTP status.
    Status(StatusCode),
    /// Never answer.
    Hang,
}

pub struct FakeNode {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FakeNode {
    pub async fn start(mode: Mode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));

        let counter = requests.clone();
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let mode = mode.clone();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let mode = mode.clone();
                        async move { Ok::<_, Infallible>(handle(mode, req).await) }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn rpc_result(id: &Value, result: Value) -> Response<Full<Bytes>> {
    json_response(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

fn rpc_error(id: &Value, code: i64, message: &str) -> Response<Full<Bytes>> {
    json_response(json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}))
}

fn json_response(body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn handle(mode: Mode, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body = req.into_body().collect().await.unwrap().to_bytes();
    let call: Value = serde_json::from_slice(&body).unwrap();
    let id = call["id"].clone();
    assert_eq!(call["jsonrpc"], "2.0");

    let chain = match mode {
        Mode::Chain(chain) => chain,
        Mode::RpcError => return rpc_error(&id, -32000, "execution reverted"),
        Mode::Status(status) => {
            return Response::builder()
                .status(status)
                .body(Full::new(Bytes::new()))
                .unwrap()
        }
        Mode::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return rpc_error(&id, -32000, "too late");
        }
    };

    if call["method"] != "eth_call" {
        return rpc_error(&id, -32601, "method not found");
    }
    assert_eq!(call["params"][1], "latest");
    let to: Address = call["params"][0]["to"].as_str().unwrap().parse().unwrap();
    let data = decode_hex(call["params"][0]["data"].as_str().unwrap()).unwrap();

    match chain.call(to, data).await {
        Ok(ret) => rpc_result(&id, Value::String(format!("0x{}", hex::encode(ret)))),
        Err(e) => rpc_error(&id, -32000, &e.to_string()),
    }
}
