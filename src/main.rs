//! Ethereum REST gateway.
//!
//! A small REST facade over an Ethereum JSON-RPC node, built with Tokio and
//! Axum: account queries, fire-and-forget fund transfers, and fan-out of
//! block / transaction notifications to in-process listeners.

use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

use eth_gateway::config::{loader, GatewayConfig};
use eth_gateway::events::consumer::EventLogger;
use eth_gateway::events::listener::{BlockListener, TransactionListener};
use eth_gateway::events::manager::SubscriptionManager;
use eth_gateway::events::registry::ListenerRegistry;
use eth_gateway::events::source::NotificationSource;
use eth_gateway::http::server::{AppState, HttpServer};
use eth_gateway::lifecycle::shutdown::{wait_for_signal, Shutdown};
use eth_gateway::node::{NodeClient, PollingNotificationSource, WsNotificationSource};
use eth_gateway::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    tracing::info!("eth-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // Config file path as the only argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => loader::load_config(Path::new(&path))?,
        None => GatewayConfig::default(),
    };
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.node.rpc_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let node = NodeClient::new(&config.node, &config.transfer).await?;

    let block_listeners: Arc<ListenerRegistry<dyn BlockListener>> =
        Arc::new(ListenerRegistry::new());
    let transaction_listeners: Arc<ListenerRegistry<dyn TransactionListener>> =
        Arc::new(ListenerRegistry::new());
    let subscriptions = Arc::new(SubscriptionManager::new(
        block_listeners,
        transaction_listeners,
    ));

    let consumer = EventLogger::new();
    consumer.register(&subscriptions);

    let source: Box<dyn NotificationSource> = match &config.node.ws_url {
        Some(ws_url) => match WsNotificationSource::connect(ws_url).await {
            Ok(source) => Box::new(source),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    ws_url = %ws_url,
                    "WebSocket connection failed, falling back to polling"
                );
                Box::new(PollingNotificationSource::new(
                    node.provider(),
                    config.node.poll_interval(),
                ))
            }
        },
        None => Box::new(PollingNotificationSource::new(
            node.provider(),
            config.node.poll_interval(),
        )),
    };
    subscriptions.enable_subscriptions(source.as_ref()).await;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let state = AppState {
        node,
        subscriptions: Arc::clone(&subscriptions),
    };
    let server = HttpServer::new(config, state);
    server.run(listener, signal).await?;

    consumer.deregister(&subscriptions);
    subscriptions.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
