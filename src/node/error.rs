//! Domain error for node-facing operations.

use thiserror::Error;

/// Error returned when the Ethereum node rejects or fails a request.
///
/// Every transport-level failure surfaces as this single kind, carrying a
/// human-readable message and the underlying cause when one exists. The
/// failure is fatal to the call that raised it, never to the service.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NodeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl NodeError {
    /// Create an error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
