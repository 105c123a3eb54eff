//! Capability ports consumed by the trigger.
//!
//! Ports define the interfaces for external collaborators (order placement,
//! logging). Adapters implement them for specific backends (tracing, stub, etc.).
//!
//! Both ports are synchronous: the trigger calls `buy` while holding its
//! critical section, so the call must complete before the flag flips.

use rust_decimal::Decimal;

use crate::error::{ExecError, ExecResult};

// =============================================================================
// Order Placer Port
// =============================================================================

/// Port for placing orders.
///
/// Implementations:
/// - `StubOrderPlacer` - For testing (records calls, optional failures)
pub trait OrderPlacer: Send + Sync {
    /// Place a buy order.
    ///
    /// # Arguments
    ///
    /// * `equity_code` - Instrument to buy
    /// * `quantity` - Number of units
    /// * `price` - Price of the triggering tick
    fn buy(&self, equity_code: &str, quantity: u32, price: Decimal) -> ExecResult<()>;

    /// Place a sell order.
    fn sell(&self, equity_code: &str, quantity: u32, price: Decimal) -> ExecResult<()>;
}

// =============================================================================
// Logger Port
// =============================================================================

/// Port for the host application's logger.
///
/// Implementations:
/// - `TracingLogger` - Forwards to `tracing` events
/// - `RecordingLogger` - For testing (records every call)
pub trait Logger: Send + Sync {
    /// Log at info level
    fn info(&self, msg: &str);

    /// Log at warning level
    fn warning(&self, msg: &str);

    /// Log at debug level
    fn debug(&self, msg: &str);

    /// Log at trace level
    fn trace(&self, msg: &str);

    /// Log at error level with the causing error
    fn error(&self, msg: &str, error: &ExecError);
}
