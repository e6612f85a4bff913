//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters exposed for Prometheus scrape)
//!
//! Request IDs flow through the HTTP middleware into every span.
//! ```

pub mod logging;
pub mod metrics;
