//! Fan-out of trigger notifications.
//!
//! The trigger's listeners run on whichever worker fired, so they only
//! forward into a broadcast channel here. Consumers read what accumulated
//! once the replay is over.

use serde::Serialize;
use tokio::sync::broadcast;
use tripwire_exec::{OrderErrored, OrderPlaced};

// =============================================================================
// Event Types
// =============================================================================

/// A trigger notification as seen by bus consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerEvent {
    /// Buy order placed
    Placed(OrderPlaced),

    /// Buy order failed
    Errored(OrderErrored),
}

// =============================================================================
// Event Bus
// =============================================================================

/// Broadcast channel carrying `TriggerEvent`s from listeners to consumers.
pub struct EventBus {
    sender: broadcast::Sender<TriggerEvent>,
}

impl EventBus {
    /// Buffers up to `capacity` events per receiver; older ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Forward `event`, returning how many receivers got it.
    pub fn send(&self, event: TriggerEvent) -> usize {
        // No receivers is fine, nobody asked to watch
        self.sender.send(event).unwrap_or(0)
    }

    /// Only events sent after this call are delivered.
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

/// What a receiver had buffered at the time of a drain.
#[derive(Debug, Default)]
pub struct Drained {
    /// Buffered events, oldest first
    pub events: Vec<TriggerEvent>,
    /// Events overwritten before this receiver read them
    pub missed: u64,
}

/// Consumer side of the bus.
pub struct EventReceiver {
    receiver: broadcast::Receiver<TriggerEvent>,
}

impl EventReceiver {
    /// Next buffered event, without waiting.
    ///
    /// `Some(Err(..))` reports a lag; reading can continue afterwards.
    pub fn try_recv(&mut self) -> Option<Result<TriggerEvent, String>> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Ok(event)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => None,
            Err(broadcast::error::TryRecvError::Lagged(count)) => {
                Some(Err(format!("Receiver lagged, missed {} events", count)))
            }
        }
    }

    /// Take everything currently buffered, counting events lost to lag.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => drained.events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => drained.missed += count,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return drained,
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
