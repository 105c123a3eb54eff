//! Tripwire Domain Layer
//!
//! Pure value types shared by the trigger core and its consumers.
//! No I/O and no synchronization primitives live here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod value_objects;

pub use events::{OrderErrored, OrderPlaced};
pub use value_objects::{DomainError, OrderSide, Tick};
