//! Stub implementations for testing.
//!
//! These implementations record what the trigger asked of its capabilities
//! without talking to a real venue or logging backend.

use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tripwire_domain::OrderSide;

use crate::error::{ExecError, ExecResult};
use crate::ports::{Logger, OrderPlacer};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Stub Order Placer
// =============================================================================

/// A call received by [`StubOrderPlacer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCall {
    /// Buy or sell
    pub side: OrderSide,
    /// Requested equity
    pub equity_code: String,
    /// Requested units
    pub quantity: u32,
    /// Requested price
    pub price: Decimal,
}

/// Stub order placer for testing.
///
/// Records every call. Can fail (or panic on) its first `n` buys, and can
/// sleep inside `buy` to widen race windows.
pub struct StubOrderPlacer {
    calls: Mutex<Vec<OrderCall>>,
    /// Remaining buys that should fail
    failures_remaining: Mutex<usize>,
    failure_message: String,
    panic_message: Option<String>,
    delay: Option<Duration>,
}

impl StubOrderPlacer {
    /// Create a stub whose orders always succeed.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures_remaining: Mutex::new(0),
            failure_message: "Simulated order failure".to_string(),
            panic_message: None,
            delay: None,
        }
    }

    /// Create a stub whose first `n` buys fail and later ones succeed.
    pub fn failing_first(n: usize) -> Self {
        let stub = Self::new();
        *lock(&stub.failures_remaining) = n;
        stub
    }

    /// Message carried by simulated rejections.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Panic with `message` on every buy.
    pub fn panicking(mut self, message: impl Into<String>) -> Self {
        self.panic_message = Some(message.into());
        self
    }

    /// Sleep for `delay` inside every buy.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<OrderCall> {
        lock(&self.calls).clone()
    }

    /// Number of buy calls received so far.
    pub fn buy_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.side == OrderSide::Buy)
            .count()
    }

    fn record(&self, side: OrderSide, equity_code: &str, quantity: u32, price: Decimal) {
        lock(&self.calls).push(OrderCall {
            side,
            equity_code: equity_code.to_string(),
            quantity,
            price,
        });
    }

    /// Check if we should fail this operation.
    fn should_fail(&self) -> bool {
        let mut remaining = lock(&self.failures_remaining);
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for StubOrderPlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderPlacer for StubOrderPlacer {
    fn buy(&self, equity_code: &str, quantity: u32, price: Decimal) -> ExecResult<()> {
        self.record(OrderSide::Buy, equity_code, quantity, price);

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(message) = &self.panic_message {
            panic!("{}", message);
        }
        if self.should_fail() {
            return Err(ExecError::OrderRejected(self.failure_message.clone()));
        }

        tracing::debug!(equity_code, quantity, %price, "Stub: buy placed");
        Ok(())
    }

    fn sell(&self, equity_code: &str, quantity: u32, price: Decimal) -> ExecResult<()> {
        self.record(OrderSide::Sell, equity_code, quantity, price);
        tracing::debug!(equity_code, quantity, %price, "Stub: sell placed");
        Ok(())
    }
}

// =============================================================================
// Recording Logger
// =============================================================================

/// Severity of a recorded log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

/// A call received by [`RecordingLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Rendered cause, for error-level calls
    pub error: Option<String>,
}

/// Logger that keeps every call in memory.
#[derive(Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in call order.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    /// Records at one level, in call order.
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        lock(&self.records)
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        lock(&self.records)
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records_at(level)
            .into_iter()
            .map(|record| record.message)
            .collect()
    }

    fn push(&self, level: LogLevel, msg: &str, error: Option<String>) {
        lock(&self.records).push(LogRecord {
            level,
            message: msg.to_string(),
            error,
        });
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg, None);
    }

    fn warning(&self, msg: &str) {
        self.push(LogLevel::Warning, msg, None);
    }

    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg, None);
    }

    fn trace(&self, msg: &str) {
        self.push(LogLevel::Trace, msg, None);
    }

    fn error(&self, msg: &str, error: &ExecError) {
        self.push(LogLevel::Error, msg, Some(error.to_string()));
    }
}

// =============================================================================
// Tests
// =============================================================================
