//! Simulation error types.

use thiserror::Error;
use tripwire_domain::DomainError;
use tripwire_exec::ExecError;

/// Simulation-level errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Execution error
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A tick worker did not complete
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
