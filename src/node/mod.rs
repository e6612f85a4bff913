//! Ethereum node integration subsystem.
//!
//! # Data Flow
//! ```text
//! config (rpc_url, ws_url, timeouts, gas policy)
//!     → client.rs (JSON-RPC queries + fire-and-forget transfers)
//!     → notifications.rs (block / transaction hash streams)
//!     → error.rs (single domain error surfaced to callers)
//! ```
//!
//! # Design Decisions
//! - All RPC calls have a configurable timeout
//! - Transfers use the node's unlocked accounts; no local key handling
//! - Graceful degradation when the node is unreachable at startup

pub mod client;
pub mod error;
pub mod notifications;

pub use client::NodeClient;
pub use error::{NodeError, NodeResult};
pub use notifications::{PollingNotificationSource, WsNotificationSource};
