//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map handler failures to HTTP status codes
//! - Keep error payloads a single JSON shape
//!
//! Requests the node rejects map to 409 Conflict; requests that never reach
//! the node because their arguments are invalid map to 400 Bad Request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::node::error::NodeError;
use crate::observability::metrics;

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by the REST handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Request failed validation before reaching the node.
    Validation(String),
    /// The blockchain client rejected or failed the request.
    Node(NodeError),
}

impl From<NodeError> for ApiError {
    fn from(error: NodeError) -> Self {
        Self::Node(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Node(error) => {
                tracing::warn!(error = %error, "Could not execute the request on the blockchain");
                metrics::record_node_error();
                (StatusCode::CONFLICT, error.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
