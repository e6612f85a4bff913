//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Node client → Registries + manager
//!     → Enable subscriptions → Start HTTP listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests
//!     → Deregister listeners → Dispose subscriptions → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then node, then subscriptions, then HTTP
//! - A service instance is single-use across this lifecycle; no restart path

pub mod shutdown;

pub use shutdown::Shutdown;
