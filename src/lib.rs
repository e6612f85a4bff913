//! REST gateway over an Ethereum JSON-RPC node.
//!
//! Exposes account queries and fire-and-forget fund transfers over HTTP,
//! and fans block / transaction notifications out to in-process listeners.

pub mod config;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod node;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use node::NodeClient;
