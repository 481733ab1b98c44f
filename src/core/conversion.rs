//! Currency conversion routed through the pivot currency.

use crate::core::currency::{PIVOT_CURRENCY, RateSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Outcome of a conversion. `converted_amount == amount * rate` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted_amount: f64,
    pub rate: f64,
}

/// Converts `request.amount` using the rates in `snapshot`.
///
/// Returns `None` when there is no snapshot yet, when a required rate is missing, or when
/// the source rate would be a zero divisor.
/// The amount itself is not validated; callers filter out non-positive amounts.
pub fn convert(request: &ConversionRequest, snapshot: Option<&RateSnapshot>) -> Option<ConversionResult> {
    let snapshot = snapshot?;
    let amount = request.amount;

    let (converted_amount, rate) = if request.from == PIVOT_CURRENCY {
        let rate = snapshot.rate(&request.to)?;
        (amount * rate, rate)
    } else if request.to == PIVOT_CURRENCY {
        let rate = divisor(snapshot, &request.from)?;
        (amount / rate, 1.0 / rate)
    } else {
        let from_rate = divisor(snapshot, &request.from)?;
        let to_rate = snapshot.rate(&request.to)?;
        let usd_amount = amount / from_rate;
        (usd_amount * to_rate, to_rate / from_rate)
    };

    Some(ConversionResult {
        from: request.from.clone(),
        to: request.to.clone(),
        amount,
        converted_amount,
        rate,
    })
}

// A zero divisor counts as a missing code. Zero multipliers pass through.
fn divisor(snapshot: &RateSnapshot, code: &str) -> Option<f64> {
    snapshot.rate(code).filter(|rate| *rate != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TOLERANCE: f64 = 1e-9;

    fn snapshot() -> RateSnapshot {
        RateSnapshot::new(
            "USD",
            HashMap::from([
                ("USD".to_string(), 1.0),
                ("EUR".to_string(), 0.85),
                ("GBP".to_string(), 0.73),
                ("JPY".to_string(), 149.5),
            ]),
        )
    }

    fn run(from: &str, to: &str, amount: f64) -> Option<ConversionResult> {
        convert(&ConversionRequest::new(from, to, amount), Some(&snapshot()))
    }

    #[test]
    fn test_from_pivot_uses_direct_rate() {
        let result = run("USD", "EUR", 100.0).unwrap();
        assert_eq!(result.from, "USD");
        assert_eq!(result.to, "EUR");
        assert_eq!(result.amount, 100.0);
        assert!((result.converted_amount - 85.0).abs() < TOLERANCE);
        assert_eq!(result.rate, 0.85);
    }

    #[test]
    fn test_to_pivot_uses_inverse_rate() {
        let result = run("EUR", "USD", 100.0).unwrap();
        assert!((result.converted_amount - 100.0 / 0.85).abs() < TOLERANCE);
        assert!((result.rate - 1.0 / 0.85).abs() < TOLERANCE);
    }

    #[test]
    fn test_cross_rate_routes_through_pivot() {
        let result = run("EUR", "GBP", 100.0).unwrap();
        assert!((result.converted_amount - 85.88).abs() < 0.01);
        assert!((result.rate - 0.8588).abs() < 0.0001);
        assert!((result.rate - 0.73 / 0.85).abs() < TOLERANCE);
    }

    #[test]
    fn test_converted_amount_equals_amount_times_rate() {
        for (from, to) in [("USD", "JPY"), ("JPY", "USD"), ("GBP", "JPY"), ("EUR", "EUR")] {
            let result = run(from, to, 42.5).unwrap();
            assert!(
                (result.converted_amount - result.amount * result.rate).abs() < 1e-6,
                "{from}->{to}"
            );
        }
    }

    #[test]
    fn test_round_trip_returns_original_amount() {
        let there = run("GBP", "JPY", 250.0).unwrap();
        let back = run("JPY", "GBP", there.converted_amount).unwrap();
        assert!((back.converted_amount - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_code_is_absent() {
        assert!(run("USD", "ZZZ", 1.0).is_none());
        assert!(run("ZZZ", "USD", 1.0).is_none());
        assert!(run("ZZZ", "EUR", 1.0).is_none());
        assert!(run("EUR", "ZZZ", 1.0).is_none());
    }

    #[test]
    fn test_no_snapshot_is_absent() {
        let request = ConversionRequest::new("USD", "EUR", 10.0);
        assert!(convert(&request, None).is_none());
    }

    #[test]
    fn test_zero_source_rate_is_treated_as_missing() {
        let mut snapshot = snapshot();
        snapshot.rates.insert("BAD".to_string(), 0.0);
        assert!(convert(&ConversionRequest::new("BAD", "USD", 1.0), Some(&snapshot)).is_none());
        assert!(convert(&ConversionRequest::new("BAD", "EUR", 1.0), Some(&snapshot)).is_none());
    }

    #[test]
    fn test_zero_target_rate_converts_to_zero() {
        let mut snapshot = snapshot();
        snapshot.rates.insert("BAD".to_string(), 0.0);
        for from in ["USD", "EUR"] {
            let result = convert(&ConversionRequest::new(from, "BAD", 10.0), Some(&snapshot)).unwrap();
            assert_eq!(result.converted_amount, 0.0, "{from}->BAD");
            assert_eq!(result.rate, 0.0, "{from}->BAD");
        }
    }

    #[test]
    fn test_amount_is_not_validated() {
        let result = run("USD", "EUR", -10.0).unwrap();
        assert!((result.converted_amount + 8.5).abs() < TOLERANCE);
    }
}
