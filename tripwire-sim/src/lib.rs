//! Tripwire Simulation Library
//!
//! Replays a synthetic tick stream from many workers into one trigger.
//!
//! # Architecture
//!
//! ```text
//! Config → Simulation → N tick workers → EquityTrigger → StubOrderPlacer
//!                                             ↓
//!                                        Event Bus → consumers
//! ```
//!
//! # Components
//!
//! - **Config**: Environment-based configuration
//! - **Event Bus**: Fan-out of placed/errored notifications
//! - **Simulation**: Worker orchestration and run report

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod event_bus;
pub mod simulation;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use event_bus::{Drained, EventBus, EventReceiver, TriggerEvent};
pub use simulation::{SimReport, Simulation};
