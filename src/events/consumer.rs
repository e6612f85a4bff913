//! Example consumer that logs blockchain notifications.

use std::sync::Arc;

use crate::events::listener::{BlockListener, TransactionListener};
use crate::events::manager::SubscriptionManager;

/// Logs every block and transaction notification it receives.
#[derive(Debug, Default)]
pub struct EventLogger;

impl EventLogger {
    /// Create a shared consumer instance.
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }

    /// Register this consumer for both notification kinds.
    pub fn register(self: &Arc<Self>, subscriptions: &SubscriptionManager) {
        subscriptions.add_block_listener(Arc::clone(self) as Arc<dyn BlockListener>);
        subscriptions.add_transaction_listener(Arc::clone(self) as Arc<dyn TransactionListener>);
    }

    /// Remove this consumer from both notification kinds.
    pub fn deregister(self: &Arc<Self>, subscriptions: &SubscriptionManager) {
        let as_block: Arc<dyn BlockListener> = Arc::clone(self) as Arc<dyn BlockListener>;
        subscriptions.remove_block_listener(&as_block);
        let as_transaction: Arc<dyn TransactionListener> =
            Arc::clone(self) as Arc<dyn TransactionListener>;
        subscriptions.remove_transaction_listener(&as_transaction);
    }
}

impl BlockListener for EventLogger {
    fn on_new_block(&self, block_hash: &str) {
        tracing::info!(block_hash, "A new block has been mined");
    }
}

impl TransactionListener for EventLogger {
    fn on_transaction_confirmed(&self, transaction_hash: &str) {
        tracing::info!(transaction_hash, "A new transaction has been confirmed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::registry::ListenerRegistry;

    fn manager() -> SubscriptionManager {
        SubscriptionManager::new(
            Arc::new(ListenerRegistry::new()),
            Arc::new(ListenerRegistry::new()),
        )
    }

    #[test]
    fn register_adds_both_listener_kinds() {
        let subscriptions = manager();
        let consumer = EventLogger::new();

        consumer.register(&subscriptions);

        assert_eq!(subscriptions.block_listener_count(), 1);
        assert_eq!(subscriptions.transaction_listener_count(), 1);
    }

    #[test]
    fn register_twice_keeps_a_single_registration() {
        let subscriptions = manager();
        let consumer = EventLogger::new();

        consumer.register(&subscriptions);
        consumer.register(&subscriptions);

        assert_eq!(subscriptions.block_listener_count(), 1);
        assert_eq!(subscriptions.transaction_listener_count(), 1);
    }

    #[test]
    fn deregister_removes_both_listener_kinds() {
        let subscriptions = manager();
        let consumer = EventLogger::new();
        consumer.register(&subscriptions);

        consumer.deregister(&subscriptions);

        assert_eq!(subscriptions.block_listener_count(), 0);
        assert_eq!(subscriptions.transaction_listener_count(), 0);
    }
}
