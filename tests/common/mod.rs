//! Shared utilities for integration testing: an in-process JSON-RPC node.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Programmable node behaviour plus a record of what it received.
#[derive(Debug)]
pub struct NodeState {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    /// Reject every `eth_sendRawTransaction` with this message.
    pub reject_with: Option<String>,
    /// Methods answered with HTTP 503 instead of a JSON-RPC body.
    pub unavailable_methods: Vec<&'static str>,
    pub raw_transactions: Mutex<Vec<Bytes>>,
    pub calls: AtomicUsize,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            chain_id: 11155111,
            nonce: 0,
            gas_price: 1_000_000_000,
            reject_with: None,
            unavailable_methods: Vec::new(),
            raw_transactions: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[allow(dead_code)]
impl NodeState {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.raw_transactions.lock().unwrap().clone()
    }
}

/// Start a mock node on an ephemeral port. Returns its URL.
pub async fn start_mock_node(state: NodeState) -> (String, Arc<NodeState>) {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/", post(handle_rpc))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), state)
}

/// A URL nothing is listening on.
#[allow(dead_code)]
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn handle_rpc(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();

    if state.unavailable_methods.iter().any(|m| *m == method) {
        return (StatusCode::SERVICE_UNAVAILABLE, "node unavailable").into_response();
    }

    let outcome: Result<Value, (i64, String)> = match method {
        "eth_chainId" => Ok(json!(format!("0x{:x}", state.chain_id))),
        "eth_getTransactionCount" => Ok(json!(format!("0x{:x}", state.nonce))),
        "eth_gasPrice" => Ok(json!(format!("0x{:x}", state.gas_price))),
        "eth_sendRawTransaction" => {
            let raw = request["params"][0]
                .as_str()
                .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok());
            match (raw, &state.reject_with) {
                (None, _) => Err((-32602, "invalid raw transaction".to_string())),
                (Some(_), Some(reason)) => Err((-32000, reason.clone())),
                (Some(raw), None) => {
                    let hash = keccak256(&raw);
                    state.raw_transactions.lock().unwrap().push(Bytes::from(raw));
                    Ok(json!(hash.to_string()))
                }
            }
        }
        other => Err((-32601, format!("method {} not found", other))),
    };

    Json(match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": code, "message": message}
        }),
    })
    .into_response()
}
