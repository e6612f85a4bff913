//! End-to-end tests for the REST surface against a mock node.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

use common::{start_failing_node, start_mock_node, TEST_ACCOUNT};
use eth_gateway::config::GatewayConfig;
use eth_gateway::events::listener::{BlockListener, TransactionListener};
use eth_gateway::events::manager::SubscriptionManager;
use eth_gateway::events::registry::ListenerRegistry;
use eth_gateway::http::server::{AppState, HttpServer};
use eth_gateway::node::NodeClient;

async fn router_for(rpc_addr: SocketAddr) -> Router {
    let mut config = GatewayConfig::default();
    config.node.rpc_url = format!("http://{rpc_addr}");
    config.node.rpc_timeout_secs = 2;

    let node = NodeClient::new(&config.node, &config.transfer).await.unwrap();
    let block_listeners: Arc<ListenerRegistry<dyn BlockListener>> =
        Arc::new(ListenerRegistry::new());
    let transaction_listeners: Arc<ListenerRegistry<dyn TransactionListener>> =
        Arc::new(ListenerRegistry::new());
    let subscriptions = Arc::new(SubscriptionManager::new(
        block_listeners,
        transaction_listeners,
    ));

    HttpServer::build_router(&config, AppState {
        node,
        subscriptions,
    })
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_accounts_returns_the_unlocked_accounts() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(Request::get("/accounts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    // Addresses come back EIP-55 checksummed; compare case-insensitively.
    assert!(body.to_lowercase().contains(TEST_ACCOUNT));
}

#[tokio::test]
async fn get_balance_converts_wei_to_ether() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(
            Request::get(format!("/accounts/{TEST_ACCOUNT}/balance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "\"1.000000000000000000\"");
}

#[tokio::test]
async fn get_transactions_count_returns_the_count() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(
            Request::get(format!("/transactions/{TEST_ACCOUNT}/count"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "10");
}

#[tokio::test]
async fn fund_transfer_is_accepted_immediately() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let payload = json!({
        "fromAccountAddress": TEST_ACCOUNT,
        "toAccountAddress": "0xeff48dbf9b40dd5ba47ff52841d359fc1e749491",
        "amountInEther": "1",
    });
    let response = router
        .oneshot(
            Request::post("/transactions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn fund_transfer_accepts_a_numeric_amount() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let payload = json!({
        "fromAccountAddress": TEST_ACCOUNT,
        "toAccountAddress": "0xeff48dbf9b40dd5ba47ff52841d359fc1e749491",
        "amountInEther": 10,
    });
    let response = router
        .oneshot(
            Request::post("/transactions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn fund_transfer_with_empty_recipient_is_rejected() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let payload = json!({
        "fromAccountAddress": TEST_ACCOUNT,
        "toAccountAddress": "",
        "amountInEther": "1",
    });
    let response = router
        .oneshot(
            Request::post("/transactions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("Recipient address"));
}

#[tokio::test]
async fn fund_transfer_with_non_positive_amount_is_rejected() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    for amount in ["0", "-1"] {
        let payload = json!({
            "fromAccountAddress": TEST_ACCOUNT,
            "toAccountAddress": "0xeff48dbf9b40dd5ba47ff52841d359fc1e749491",
            "amountInEther": amount,
        });
        let response = router
            .clone()
            .oneshot(
                Request::post("/transactions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn node_failure_maps_to_conflict_and_names_the_account() {
    let node = start_failing_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(
            Request::get(format!("/accounts/{TEST_ACCOUNT}/balance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_string(response).await.contains(TEST_ACCOUNT));
}

#[tokio::test]
async fn health_reflects_node_reachability() {
    let healthy = router_for(start_mock_node().await).await;
    let response = healthy
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let unhealthy = router_for(start_failing_node().await).await;
    let response = unhealthy
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn status_reports_the_fanout_state() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(Request::get("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["block_listeners"], 0);
    assert_eq!(body["block_subscription_active"], false);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let node = start_mock_node().await;
    let router = router_for(node).await;

    let response = router
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
