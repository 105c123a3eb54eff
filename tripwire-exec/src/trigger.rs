//! EquityTrigger: fire-once buy on a price crossing.
//!
//! The trigger receives ticks for an equity, possibly from many threads at
//! once. The first tick priced strictly below the threshold places exactly
//! one buy order, after which the trigger ignores every further tick.
//!
//! # Flow
//!
//! ```text
//! Tick → fast path (fired?) → threshold check → critical section
//!      → OrderPlacer::buy → fired = true → Logger → notification
//! ```
//!
//! A panic from either capability inside the critical section is caught
//! and reported through the errored notification.
//!
//! The `fired` flag is read lock-free on the fast path and only ever
//! written inside the critical section. Notifications are emitted after the
//! critical section is released.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use tripwire_domain::{OrderPlaced, Tick};

use crate::error::{ExecError, ExecResult};
use crate::listeners::{Listeners, SubscriptionId};
use crate::ports::{Logger, OrderPlacer};
use crate::OrderErrored;

/// Units bought when the trigger fires.
pub const BUY_QUANTITY: u32 = 1;

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`EquityTrigger`].
///
/// Both capabilities are required; `build` reports the first missing one.
pub struct EquityTriggerBuilder {
    threshold: Decimal,
    order_placer: Option<Arc<dyn OrderPlacer>>,
    logger: Option<Arc<dyn Logger>>,
}

impl EquityTriggerBuilder {
    /// Set the order placer used for the buy.
    pub fn order_placer(mut self, order_placer: Arc<dyn OrderPlacer>) -> Self {
        self.order_placer = Some(order_placer);
        self
    }

    /// Set the logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the trigger.
    ///
    /// # Errors
    ///
    /// `ExecError::InvalidArgument` naming `order_placer` or `logger` if
    /// either was not supplied.
    pub fn build(self) -> ExecResult<EquityTrigger> {
        let order_placer = self
            .order_placer
            .ok_or(ExecError::InvalidArgument { param: "order_placer" })?;
        let logger = self
            .logger
            .ok_or(ExecError::InvalidArgument { param: "logger" })?;

        Ok(EquityTrigger::new(self.threshold, order_placer, logger))
    }
}

// =============================================================================
// EquityTrigger
// =============================================================================

/// Places a single buy order the first time a tick crosses below the threshold.
///
/// Guarantees, regardless of how many threads call [`receive_tick`]:
/// - at most one `OrderPlacer::buy` call per instance
/// - at most one notification, either placed or errored
/// - once fired, the trigger never re-arms
///
/// [`receive_tick`]: EquityTrigger::receive_tick
pub struct EquityTrigger {
    id: Uuid,
    threshold: Decimal,
    order_placer: Arc<dyn OrderPlacer>,
    logger: Arc<dyn Logger>,
    /// Lock-free view of the terminal state
    fired: AtomicBool,
    /// Serializes the check-buy-flip sequence
    sync: Mutex<()>,
    placed: Listeners<OrderPlaced>,
    errored: Listeners<OrderErrored>,
}

impl EquityTrigger {
    /// Create a trigger from both capabilities.
    ///
    /// The threshold is not validated; any decimal is accepted.
    pub fn new(
        threshold: Decimal,
        order_placer: Arc<dyn OrderPlacer>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            threshold,
            order_placer,
            logger,
            fired: AtomicBool::new(false),
            sync: Mutex::new(()),
            placed: Listeners::new(),
            errored: Listeners::new(),
        }
    }

    /// Start building a trigger for `threshold`.
    pub fn builder(threshold: Decimal) -> EquityTriggerBuilder {
        EquityTriggerBuilder {
            threshold,
            order_placer: None,
            logger: None,
        }
    }

    /// Instance identifier, attached to diagnostics.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configured threshold.
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Feed one tick.
    ///
    /// Never fails: order placement errors (and panics) are logged and
    /// delivered to the errored listeners instead.
    pub fn receive_tick(&self, equity_code: &str, price: Decimal) {
        if self.fired.load(Ordering::Acquire) {
            return;
        }

        // Strictly below triggers; equal to the threshold does not
        if price >= self.threshold {
            return;
        }

        let outcome = {
            let _guard = self.sync.lock().unwrap_or_else(PoisonError::into_inner);

            // Another caller may have fired between the fast path and the lock
            if self.fired.load(Ordering::Acquire) {
                return;
            }

            let outcome = contain(|| self.order_placer.buy(equity_code, BUY_QUANTITY, price));
            // Flip before logging so a misbehaving logger cannot re-arm us
            self.fired.store(true, Ordering::Release);

            // A panicking success log turns the outcome into an error
            let outcome = outcome.and_then(|()| {
                contain(|| {
                    self.logger.info(&format!(
                        "Bought equityCode '{}' at price '{}'",
                        equity_code, price
                    ));
                    Ok(())
                })
            });

            if let Err(e) = &outcome {
                let logged = contain(|| {
                    self.logger
                        .error(&format!("Error seen in ReceiveTick: {}", e), e);
                    Ok(())
                });
                if let Err(log_error) = logged {
                    debug!(trigger_id = %self.id, error = %log_error, "Logger failed while reporting order error");
                }
            }
            outcome
        };

        match outcome {
            Ok(()) => {
                debug!(trigger_id = %self.id, equity_code, %price, "Trigger fired: order placed");
                self.placed.emit(&OrderPlaced::new(equity_code, price));
            }
            Err(e) => {
                debug!(trigger_id = %self.id, equity_code, %price, error = %e, "Trigger fired: order errored");
                self.errored
                    .emit(&OrderErrored::new(equity_code, price, Arc::new(e)));
            }
        }
    }

    /// Feed one tick value.
    pub fn receive(&self, tick: &Tick) {
        self.receive_tick(tick.equity_code(), tick.price());
    }

    /// Whether the trigger has fired (successfully or not).
    ///
    /// Reads under the critical section, so a caller racing a buy in
    /// progress waits for its outcome.
    pub fn is_fired(&self) -> bool {
        let _guard = self.sync.lock().unwrap_or_else(PoisonError::into_inner);
        self.fired.load(Ordering::Acquire)
    }

    /// Subscribe to the placed notification.
    pub fn on_order_placed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OrderPlaced) + Send + Sync + 'static,
    {
        self.placed.subscribe(callback)
    }

    /// Subscribe to the errored notification.
    pub fn on_order_errored<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OrderErrored) + Send + Sync + 'static,
    {
        self.errored.subscribe(callback)
    }

    /// Detach a placed listener.
    pub fn unsubscribe_placed(&self, id: SubscriptionId) -> bool {
        self.placed.unsubscribe(id)
    }

    /// Detach an errored listener.
    pub fn unsubscribe_errored(&self, id: SubscriptionId) -> bool {
        self.errored.unsubscribe(id)
    }
}

impl std::fmt::Debug for EquityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquityTrigger")
            .field("id", &self.id)
            .field("threshold", &self.threshold)
            .field("fired", &self.fired.load(Ordering::Acquire))
            .field("placed_listeners", &self.placed.len())
            .field("errored_listeners", &self.errored.len())
            .finish()
    }
}

/// Run a capability call, converting a panic into `ExecError::Panicked`.
fn contain<F>(call: F) -> ExecResult<()>
where
    F: FnOnce() -> ExecResult<()>,
{
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(ExecError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
