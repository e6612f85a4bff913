//! Listener capabilities invoked on blockchain notifications.

/// Listener for newly mined blocks.
///
/// Registered listeners are held behind `Arc`; registry membership is keyed
/// by the `Arc` allocation, so the same instance registers at most once.
pub trait BlockListener: Send + Sync {
    /// Called with the hash of each newly mined block.
    fn on_new_block(&self, block_hash: &str);
}

/// Listener for transactions confirmed on the chain.
pub trait TransactionListener: Send + Sync {
    /// Called with the hash of each confirmed transaction.
    fn on_transaction_confirmed(&self, transaction_hash: &str);
}
