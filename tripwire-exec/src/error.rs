//! Execution layer error types.

use thiserror::Error;

/// Errors that can occur while building or running a trigger.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A required capability was not supplied at construction
    #[error("Invalid argument: {param} is required")]
    InvalidArgument {
        /// Name of the missing parameter
        param: &'static str,
    },

    /// Order was rejected by the order placer
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Exchange communication error
    #[error("Exchange error: {0}")]
    Exchange(String),

    /// The order placer panicked while placing an order
    #[error("Order placer panicked: {0}")]
    Panicked(String),
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
