//! HTTP server setup and REST handlers.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Expose the blockchain facade operations over REST
//! - Health probe for the node connection

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::events::manager::SubscriptionManager;
use crate::http::request::{FundTransferRequest, MakeRequestUuid};
use crate::http::response::ApiError;
use crate::node::NodeClient;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub node: NodeClient,
    pub subscriptions: Arc<SubscriptionManager>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/accounts", get(get_accounts))
            .route("/accounts/{account_address}/balance", get(get_account_balance))
            .route(
                "/transactions/{account_address}/count",
                get(get_transactions_count),
            )
            .route("/transactions", post(fund_transfer))
            .route("/health", get(get_health))
            .route("/status", get(get_status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut signal: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = signal.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Returns the list of accounts owned (unlocked) by the node.
async fn get_accounts(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    metrics::record_request("accounts");
    let accounts = state.node.accounts().await?;
    Ok(Json(accounts))
}

/// Returns the balance of the given account, in ether.
async fn get_account_balance(
    State(state): State<AppState>,
    Path(account_address): Path<String>,
) -> Result<Json<String>, ApiError> {
    metrics::record_request("balance");
    let balance = state.node.balance(&account_address).await?;
    Ok(Json(balance))
}

/// Returns the number of transactions sent from the given account.
async fn get_transactions_count(
    State(state): State<AppState>,
    Path(account_address): Path<String>,
) -> Result<Json<u64>, ApiError> {
    metrics::record_request("transactions_count");
    let count = state.node.transaction_count(&account_address).await?;
    Ok(Json(count))
}

/// Submits a fund transfer. Accepted immediately; the send itself is
/// asynchronous and any failure surfaces only in the logs.
async fn fund_transfer(
    State(state): State<AppState>,
    Json(request): Json<FundTransferRequest>,
) -> Result<StatusCode, ApiError> {
    metrics::record_request("fund_transfer");
    request.validate().map_err(ApiError::Validation)?;
    state.node.transfer_fund(
        &request.from_account_address,
        &request.to_account_address,
        &request.amount_in_ether,
    )?;
    Ok(StatusCode::ACCEPTED)
}

/// Liveness probe against the node.
async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.node.block_number().await {
        Ok(_) => (StatusCode::OK, "ok").into_response(),
        Err(error) => {
            tracing::warn!(error = %error, "Health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "node unreachable").into_response()
        }
    }
}

#[derive(Serialize)]
struct GatewayStatus {
    version: &'static str,
    block_listeners: usize,
    transaction_listeners: usize,
    block_subscription_active: bool,
    transaction_subscription_active: bool,
}

/// Operational snapshot of the fan-out core.
async fn get_status(State(state): State<AppState>) -> Json<GatewayStatus> {
    Json(GatewayStatus {
        version: env!("CARGO_PKG_VERSION"),
        block_listeners: state.subscriptions.block_listener_count(),
        transaction_listeners: state.subscriptions.transaction_listener_count(),
        block_subscription_active: state.subscriptions.block_subscription_active(),
        transaction_subscription_active: state.subscriptions.transaction_subscription_active(),
    })
}
