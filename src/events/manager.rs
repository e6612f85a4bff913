//! Bridges the node's notification streams to the listener registries.
//!
//! # Data Flow
//! ```text
//! NotificationSource (block stream, transaction stream)
//!     → Subscription drain tasks (one per stream)
//!     → ListenerRegistry snapshot per event
//!     → every registered listener, sequentially
//! ```
//!
//! # Lifecycle
//! A manager instance is single-use: `enable_subscriptions` once, then
//! `shutdown` once. Disposal failures and repeated shutdowns are logged as
//! warnings, never escalated.

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::listener::{BlockListener, TransactionListener};
use crate::events::registry::ListenerRegistry;
use crate::events::source::NotificationSource;
use crate::events::subscription::Subscription;
use crate::observability::metrics;

/// Owns the two listener registries' dispatch side and the subscription pair.
pub struct SubscriptionManager {
    block_listeners: Arc<ListenerRegistry<dyn BlockListener>>,
    transaction_listeners: Arc<ListenerRegistry<dyn TransactionListener>>,
    block_subscription: Mutex<Option<Subscription>>,
    transaction_subscription: Mutex<Option<Subscription>>,
}

impl SubscriptionManager {
    /// Create a manager dispatching into the given registries.
    pub fn new(
        block_listeners: Arc<ListenerRegistry<dyn BlockListener>>,
        transaction_listeners: Arc<ListenerRegistry<dyn TransactionListener>>,
    ) -> Self {
        Self {
            block_listeners,
            transaction_listeners,
            block_subscription: Mutex::new(None),
            transaction_subscription: Mutex::new(None),
        }
    }

    /// Subscribe to block and transaction notifications.
    ///
    /// Each stream that cannot be obtained is logged and skipped; the other
    /// stream is still attempted. The caller owns the lifecycle and must
    /// invoke this exactly once per manager instance — calling it again
    /// replaces the stored handles and leaves the previous drain tasks to
    /// be aborted on drop.
    pub async fn enable_subscriptions(&self, source: &dyn NotificationSource) {
        match source.block_hashes().await {
            Ok(events) => {
                tracing::info!("Subscribed to newly created blocks on the blockchain");
                let registry = Arc::clone(&self.block_listeners);
                let subscription = Subscription::spawn("block", events, move |block_hash| {
                    metrics::record_notification("block");
                    for listener in registry.snapshot() {
                        listener.on_new_block(block_hash);
                    }
                });
                Self::store(&self.block_subscription, subscription);
            }
            Err(error) => {
                tracing::error!(error = %error, "Could not subscribe to block notifications");
            }
        }

        match source.transaction_hashes().await {
            Ok(events) => {
                tracing::info!("Subscribed to newly confirmed transactions on the blockchain");
                let registry = Arc::clone(&self.transaction_listeners);
                let subscription =
                    Subscription::spawn("transaction", events, move |transaction_hash| {
                        metrics::record_notification("transaction");
                        for listener in registry.snapshot() {
                            listener.on_transaction_confirmed(transaction_hash);
                        }
                    });
                Self::store(&self.transaction_subscription, subscription);
            }
            Err(error) => {
                tracing::error!(error = %error, "Could not subscribe to transaction notifications");
            }
        }
    }

    /// Unregister all listeners and dispose both subscriptions.
    ///
    /// Disposals are attempted independently; a failed or repeated disposal
    /// is a warning, not an error. A dispatch racing this call may still
    /// deliver to a snapshot taken before the clear — accepted, best-effort.
    pub fn shutdown(&self) {
        self.block_listeners.clear();
        self.transaction_listeners.clear();
        tracing::info!("Block and transaction listeners have been unregistered");

        Self::dispose(&self.block_subscription, "block");
        Self::dispose(&self.transaction_subscription, "transaction");
    }

    /// Register a listener for newly mined blocks.
    pub fn add_block_listener(&self, listener: Arc<dyn BlockListener>) {
        self.block_listeners.add(listener);
    }

    /// Unregister a block listener. No-op if it is not registered.
    pub fn remove_block_listener(&self, listener: &Arc<dyn BlockListener>) {
        self.block_listeners.remove(listener);
    }

    /// Register a listener for confirmed transactions.
    pub fn add_transaction_listener(&self, listener: Arc<dyn TransactionListener>) {
        self.transaction_listeners.add(listener);
    }

    /// Unregister a transaction listener. No-op if it is not registered.
    pub fn remove_transaction_listener(&self, listener: &Arc<dyn TransactionListener>) {
        self.transaction_listeners.remove(listener);
    }

    /// Number of registered block listeners.
    pub fn block_listener_count(&self) -> usize {
        self.block_listeners.len()
    }

    /// Number of registered transaction listeners.
    pub fn transaction_listener_count(&self) -> usize {
        self.transaction_listeners.len()
    }

    /// Whether the block subscription is currently delivering.
    pub fn block_subscription_active(&self) -> bool {
        Self::slot_active(&self.block_subscription)
    }

    /// Whether the transaction subscription is currently delivering.
    pub fn transaction_subscription_active(&self) -> bool {
        Self::slot_active(&self.transaction_subscription)
    }

    fn store(slot: &Mutex<Option<Subscription>>, subscription: Subscription) {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(subscription);
    }

    fn slot_active(slot: &Mutex<Option<Subscription>>) -> bool {
        slot.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    fn dispose(slot: &Mutex<Option<Subscription>>, stream: &str) {
        let taken = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        match taken {
            Some(subscription) => match subscription.cancel() {
                Ok(()) => tracing::info!(stream, "Unsubscribed from notifications"),
                Err(error) => tracing::warn!(
                    stream,
                    error = %error,
                    "Failed to cancel notification subscription"
                ),
            },
            None => tracing::warn!(stream, "No active subscription to cancel"),
        }
    }
}
