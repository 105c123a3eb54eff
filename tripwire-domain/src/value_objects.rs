//! Value Objects for the Tripwire domain
//!
//! Immutable domain primitives. Validation happens at construction time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Equity code must be non-empty
    #[error("Invalid equity code: {0}")]
    InvalidEquityCode(String),
}

// =============================================================================
// OrderSide
// =============================================================================

/// Direction of an order sent to an order placer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

// =============================================================================
// Tick
// =============================================================================

/// One price observation for an equity.
///
/// Ticks are consumed per call and never stored by the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    equity_code: String,
    price: Decimal,
}

impl Tick {
    /// Create a new tick.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEquityCode` if the code is empty or blank
    pub fn new(equity_code: impl Into<String>, price: Decimal) -> Result<Self, DomainError> {
        let equity_code = equity_code.into();
        if equity_code.trim().is_empty() {
            return Err(DomainError::InvalidEquityCode(
                "Equity code must be non-empty".to_string(),
            ));
        }
        Ok(Self { equity_code, price })
    }

    /// Equity the price refers to
    pub fn equity_code(&self) -> &str {
        &self.equity_code
    }

    /// Observed price
    pub fn price(&self) -> Decimal {
        self.price
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.equity_code, self.price)
    }
}

// =============================================================================
// Tests
// =============================================================================
