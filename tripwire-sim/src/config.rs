//! Simulation configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{SimError, SimResult};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

// =============================================================================
// Configuration
// =============================================================================

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Equity every tick refers to
    pub equity_code: String,
    /// Trigger threshold (buys strictly below)
    pub threshold: Decimal,
    /// Price of the first tick
    pub start_price: Decimal,
    /// Price change between consecutive ticks
    pub price_step: Decimal,
    /// Ticks replayed by each worker
    pub ticks: usize,
    /// Concurrent workers feeding the trigger
    pub workers: usize,
    /// Leading buys the stub order placer rejects
    pub fail_buys: usize,
}

impl SimConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> SimResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let equity_code = lookup("TRIPWIRE_EQUITY_CODE").unwrap_or(defaults.equity_code);
        if equity_code.trim().is_empty() {
            return Err(SimError::Config(
                "Invalid TRIPWIRE_EQUITY_CODE: must be non-empty".to_string(),
            ));
        }

        let threshold = parse_or(&lookup, "TRIPWIRE_THRESHOLD", defaults.threshold)?;
        let start_price = parse_or(&lookup, "TRIPWIRE_START_PRICE", defaults.start_price)?;
        let price_step = parse_or(&lookup, "TRIPWIRE_PRICE_STEP", defaults.price_step)?;
        let ticks = parse_positive(&lookup, "TRIPWIRE_TICKS", defaults.ticks)?;
        let workers = parse_positive(&lookup, "TRIPWIRE_WORKERS", defaults.workers)?;
        let fail_buys = parse_or(&lookup, "TRIPWIRE_FAIL_BUYS", defaults.fail_buys)?;

        let config = Self {
            equity_code,
            threshold,
            start_price,
            price_step,
            ticks,
            workers,
            fail_buys,
        };

        // The walk is monotonic, so the last tick bounds every other one
        config.price_at(config.ticks - 1)?;
        Ok(config)
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            equity_code: "GBPEUR".to_string(),
            threshold: Decimal::new(300, 0),
            start_price: Decimal::new(310, 0),
            price_step: Decimal::new(-5, 0),
            ticks: 8,
            workers: 4,
            fail_buys: 0,
        }
    }

    /// Price of the `index`-th tick of every worker's walk.
    ///
    /// # Errors
    /// `SimError::Config` if the price is not representable as a `Decimal`
    pub fn price_at(&self, index: usize) -> SimResult<Decimal> {
        self.price_step
            .checked_mul(Decimal::from(index as u64))
            .and_then(|offset| self.start_price.checked_add(offset))
            .ok_or_else(|| {
                SimError::Config(format!(
                    "Price walk overflows at tick {}: TRIPWIRE_START_PRICE={}, TRIPWIRE_PRICE_STEP={}",
                    index, self.start_price, self.price_step
                ))
            })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            equity_code: "GBPEUR".to_string(),
            threshold: Decimal::new(300, 0),
            start_price: Decimal::new(320, 0),
            price_step: Decimal::new(-25, 1), // -2.5
            ticks: 32,
            workers: 8,
            fail_buys: 0,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> SimResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => T::from_str(val.trim())
            .map_err(|_| SimError::Config(format!("Invalid {} value: {}", key, val))),
        None => Ok(default),
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: usize) -> SimResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value == 0 {
        return Err(SimError::Config(format!("{} must be greater than 0", key)));
    }
    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SimConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.price_step, dec!(-2.5));
    }

    #[test]
    fn test_overrides() {
        let config = SimConfig::from_lookup(lookup_from(&[
            ("TRIPWIRE_EQUITY_CODE", "EURUSD"),
            ("TRIPWIRE_THRESHOLD", "1.05"),
            ("TRIPWIRE_START_PRICE", "1.10"),
            ("TRIPWIRE_PRICE_STEP", "-0.01"),
            ("TRIPWIRE_TICKS", "10"),
            ("TRIPWIRE_WORKERS", "17"),
            ("TRIPWIRE_FAIL_BUYS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.equity_code, "EURUSD");
        assert_eq!(config.threshold, dec!(1.05));
        assert_eq!(config.start_price, dec!(1.10));
        assert_eq!(config.price_step, dec!(-0.01));
        assert_eq!(config.ticks, 10);
        assert_eq!(config.workers, 17);
        assert_eq!(config.fail_buys, 1);
    }

    #[test]
    fn test_invalid_decimal() {
        let err = SimConfig::from_lookup(lookup_from(&[("TRIPWIRE_THRESHOLD", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("TRIPWIRE_THRESHOLD"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err =
            SimConfig::from_lookup(lookup_from(&[("TRIPWIRE_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, SimError::Config(msg) if msg.contains("TRIPWIRE_WORKERS")));
    }

    #[test]
    fn test_empty_equity_code_rejected() {
        let err =
            SimConfig::from_lookup(lookup_from(&[("TRIPWIRE_EQUITY_CODE", " ")])).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_price_walk() {
        let config = SimConfig::test();
        assert_eq!(config.price_at(0).unwrap(), dec!(310));
        assert_eq!(config.price_at(2).unwrap(), dec!(300));
        assert_eq!(config.price_at(3).unwrap(), dec!(295));
    }

    #[test]
    fn test_overflowing_price_walk_rejected() {
        let err = SimConfig::from_lookup(lookup_from(&[
            ("TRIPWIRE_PRICE_STEP", "-79228162514264337593543950335"),
            ("TRIPWIRE_TICKS", "3"),
        ]))
        .unwrap_err();

        assert!(matches!(err, SimError::Config(msg) if msg.contains("TRIPWIRE_PRICE_STEP")));
    }

    #[test]
    fn test_price_at_overflow_is_error() {
        let config = SimConfig {
            start_price: Decimal::MAX,
            price_step: dec!(1),
            ..SimConfig::test()
        };

        assert_eq!(config.price_at(0).unwrap(), Decimal::MAX);
        assert!(matches!(config.price_at(1), Err(SimError::Config(_))));
    }
}
