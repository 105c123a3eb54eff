//! Tripwire Execution Layer
//!
//! Fire-once buy trigger with injected capabilities.
//!
//! # Architecture
//!
//! ```text
//! Tick source (many threads) → EquityTrigger → OrderPlacer (once) → Listeners
//! ```
//!
//! # Components
//!
//! - **Ports**: Traits for the order placer and logger capabilities
//! - **Trigger**: `EquityTrigger`, at most one buy per instance
//! - **Listeners**: Subscription registry for placed/errored notifications
//! - **Logging**: `Logger` adapter over `tracing`
//! - **Stub**: Recording implementations for tests and simulations
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use tripwire_exec::{EquityTrigger, StubOrderPlacer, TracingLogger};
//!
//! let placer = Arc::new(StubOrderPlacer::new());
//! let trigger = EquityTrigger::builder(Decimal::new(300, 0))
//!     .order_placer(placer.clone())
//!     .logger(Arc::new(TracingLogger::default()))
//!     .build()?;
//!
//! trigger.on_order_placed(|placed| println!("bought {}", placed.equity_code));
//! trigger.receive_tick("GBPEUR", Decimal::new(2535, 1));
//! trigger.receive_tick("GBPEUR", Decimal::new(2500, 1));
//!
//! assert_eq!(placer.buy_count(), 1);
//! # Ok::<(), tripwire_exec::ExecError>(())
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod listeners;
pub mod logging;
pub mod ports;
pub mod stub;
pub mod trigger;

// Re-exports for convenience
pub use error::{ExecError, ExecResult};
pub use listeners::{Listeners, SubscriptionId};
pub use logging::TracingLogger;
pub use ports::{Logger, OrderPlacer};
pub use stub::{LogLevel, LogRecord, OrderCall, RecordingLogger, StubOrderPlacer};
pub use trigger::{EquityTrigger, EquityTriggerBuilder, BUY_QUANTITY};
pub use tripwire_domain::{OrderPlaced, Tick};

/// Errored notification carrying the order placer's error.
pub type OrderErrored = tripwire_domain::OrderErrored<ExecError>;
