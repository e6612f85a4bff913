//! Concurrent, identity-keyed listener registries.
//!
//! # Responsibilities
//! - Hold the currently registered listeners of one kind
//! - Support add/remove/iterate from independent threads without external locking
//! - Provide a stable snapshot for a single dispatch pass

use dashmap::DashMap;
use std::sync::Arc;

/// A concurrent set of listeners, keyed by `Arc` identity.
///
/// All operations are total: adding an already-present listener and removing
/// an absent one are no-ops. A dispatch pass iterates over a [`snapshot`]
/// taken at one instant; listeners added or removed while a pass is in
/// flight affect only later passes.
///
/// [`snapshot`]: ListenerRegistry::snapshot
pub struct ListenerRegistry<L: ?Sized> {
    listeners: DashMap<usize, Arc<L>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
        }
    }

    // Identity is the listener's allocation address.
    fn key(listener: &Arc<L>) -> usize {
        Arc::as_ptr(listener).cast::<()>() as usize
    }

    /// Register a listener. No-op if this instance is already registered.
    pub fn add(&self, listener: Arc<L>) {
        self.listeners.entry(Self::key(&listener)).or_insert(listener);
    }

    /// Remove a listener by identity. No-op if it is not registered.
    pub fn remove(&self, listener: &Arc<L>) {
        self.listeners.remove(&Self::key(listener));
    }

    /// The current members, in implementation-defined order.
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Remove all members. Used during shutdown.
    pub fn clear(&self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
