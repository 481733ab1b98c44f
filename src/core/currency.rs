//! Currency and rate data abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Currency code against which the rate service publishes every other rate.
pub const PIVOT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// The latest set of rates fetched from a [`RateSource`], relative to `base`.
///
/// Snapshots are replaced wholesale on every successful fetch. `rates[base] == 1.0` is
/// expected but not enforced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateSnapshot {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub next_update_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.into(),
            rates,
            updated_at: None,
            next_update_at: None,
        }
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

/// A remote service that returns a full snapshot of rates, or a descriptive failure.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_display() {
        let currency = Currency::new("EUR", "Euro");
        assert_eq!(currency.to_string(), "EUR - Euro");
    }

    #[test]
    fn test_currency_equality_by_value() {
        assert_eq!(Currency::new("GBP", "British Pound"), Currency::new("GBP", "British Pound"));
        assert_ne!(Currency::new("GBP", "British Pound"), Currency::new("GBP", "GBP"));
    }

    #[test]
    fn test_snapshot_rate_lookup() {
        let snapshot = RateSnapshot::new("USD", HashMap::from([("EUR".to_string(), 0.85)]));
        assert_eq!(snapshot.rate("EUR"), Some(0.85));
        assert_eq!(snapshot.rate("JPY"), None);
    }
}
