//! Boundary with the notification source.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Error carried by a notification stream, at subscribe time or per event.
pub type StreamError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A push sequence of opaque `0x…` hash strings.
pub type HashStream = BoxStream<'static, Result<String, StreamError>>;

/// Produces the node's push-based notification streams.
///
/// The fan-out core depends only on the ability to subscribe, receive a
/// sequence of hash-bearing events, and observe item-level errors. An `Err`
/// item reports a failure on the stream without ending it; the stream ends
/// when the source stops producing. There is no automatic resubscription —
/// recovering a dead stream is a restart-the-service decision.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Subscribe to hashes of newly mined blocks.
    async fn block_hashes(&self) -> Result<HashStream, StreamError>;

    /// Subscribe to hashes of transactions confirmed in new blocks.
    async fn transaction_hashes(&self) -> Result<HashStream, StreamError>;
}
