//! Trigger notifications
//!
//! Payloads delivered synchronously to listeners when a trigger fires.
//! Each trigger emits at most one of these over its lifetime.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;
use std::sync::Arc;

/// A buy order was placed after a triggering tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    /// Equity the order was placed for
    pub equity_code: String,
    /// Price of the triggering tick
    pub price: Decimal,
    /// When the notification was raised
    pub occurred_at: DateTime<Utc>,
}

impl OrderPlaced {
    /// Create a notification stamped with the current time.
    pub fn new(equity_code: impl Into<String>, price: Decimal) -> Self {
        Self {
            equity_code: equity_code.into(),
            price,
            occurred_at: Utc::now(),
        }
    }
}

/// Placing the buy order failed after a triggering tick.
///
/// `E` is the order placer's error type. The cause is shared so that every
/// listener observes the same original error value.
#[derive(Debug, Serialize)]
#[serde(bound(serialize = "E: Display"))]
pub struct OrderErrored<E> {
    /// Equity the order was attempted for
    pub equity_code: String,
    /// Price of the triggering tick
    pub price: Decimal,
    /// Error that caused the failure
    #[serde(serialize_with = "serialize_display")]
    pub error: Arc<E>,
    /// When the notification was raised
    pub occurred_at: DateTime<Utc>,
}

impl<E> OrderErrored<E> {
    /// Create a notification stamped with the current time.
    pub fn new(equity_code: impl Into<String>, price: Decimal, error: Arc<E>) -> Self {
        Self {
            equity_code: equity_code.into(),
            price,
            error,
            occurred_at: Utc::now(),
        }
    }
}

// Manual impl: deriving would require `E: Clone`.
impl<E> Clone for OrderErrored<E> {
    fn clone(&self) -> Self {
        Self {
            equity_code: self.equity_code.clone(),
            price: self.price,
            error: Arc::clone(&self.error),
            occurred_at: self.occurred_at,
        }
    }
}

fn serialize_display<S, E>(error: &Arc<E>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    E: Display,
{
    serializer.collect_str(error.as_ref())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Debug, thiserror::Error)]
    #[error("bad buy: {0}")]
    struct TestError(String);

    #[test]
    fn test_order_placed_serialization() {
        let placed = OrderPlaced::new("GBPEUR", dec!(253.5));

        let json = serde_json::to_string(&placed).unwrap();
        let parsed: OrderPlaced = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, placed);
    }

    #[test]
    fn test_order_errored_serializes_cause_as_message() {
        let errored = OrderErrored::new(
            "GBPEUR",
            dec!(253.5),
            Arc::new(TestError("rejected".to_string())),
        );

        let value = serde_json::to_value(&errored).unwrap();
        assert_eq!(value["equity_code"], "GBPEUR");
        assert_eq!(value["error"], "bad buy: rejected");
    }

    #[test]
    fn test_order_errored_clone_shares_cause() {
        let errored = OrderErrored::new("GBPEUR", dec!(1), Arc::new(TestError("x".to_string())));
        let cloned = errored.clone();

        assert!(Arc::ptr_eq(&errored.error, &cloned.error));
    }
}
