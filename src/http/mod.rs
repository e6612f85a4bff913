//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, routes, middleware)
//!     → request.rs (request ID, payload validation)
//!     → node client / subscription manager
//!     → response.rs (status mapping, error bodies)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::FundTransferRequest;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
