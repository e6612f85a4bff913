//! Shared utilities for integration tests: in-process mock JSON-RPC nodes.

use axum::http::StatusCode;
use axum::routing::{any, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Account the mock node owns and answers for.
pub const TEST_ACCOUNT: &str = "0x5dd4232f1af576f239d69f77f61dc08d9fda4ca2";

/// One ether, in wei, as the node encodes it.
pub const ONE_ETHER_WEI_HEX: &str = "0xde0b6b3a7640000";

/// Start a mock Ethereum node answering canned JSON-RPC responses.
///
/// Balance queries report one ether, transaction counts report ten, and
/// `eth_accounts` reports exactly [`TEST_ACCOUNT`].
pub async fn start_mock_node() -> SocketAddr {
    let router = Router::new().route("/", post(rpc_handler));
    serve(router).await
}

/// Start a mock node whose every response is an HTTP 500.
pub async fn start_failing_node() -> SocketAddr {
    let router = Router::new().route("/", any(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    serve(router).await
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn rpc_handler(Json(request): Json<Value>) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default();
    let id = request["id"].clone();
    let result = match method {
        "eth_accounts" => json!([TEST_ACCOUNT]),
        "eth_getBalance" => json!(ONE_ETHER_WEI_HEX),
        "eth_getTransactionCount" => json!("0xa"),
        "eth_blockNumber" => json!("0x10"),
        "eth_chainId" => json!("0x539"),
        "eth_gasPrice" => json!("0x77359400"),
        "eth_sendTransaction" => {
            json!("0x7f9fade1c0d57a7af66ab4ead79fade1c0d57a7af66ab4ead7c2c2eb7b11a91385")
        }
        _ => Value::Null,
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}
