//! Listener registry for trigger notifications.
//!
//! Maps subscription handles to callbacks. Emission snapshots the current
//! callbacks and invokes them with no registry lock held, so a callback may
//! subscribe, unsubscribe or call back into the trigger.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Handle returned by `Listeners::subscribe`, used to detach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registry of callbacks for one notification type.
pub struct Listeners<E> {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E> Listeners<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Detach a callback. Returns `false` if the handle was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write().unwrap_or_else(PoisonError::into_inner);
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every callback registered at the time of the call.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Callback<E>> = self
            .callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
