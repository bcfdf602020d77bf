use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios expressed as decimals (0.4 = 40%).
pub type Rate = Decimal;

/// User-facing percentages as entered on the forms (8.5 = 8.5%).
pub type Percent = Decimal;

/// Round to whole currency units, half away from zero.
pub fn round_whole(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to paise (two decimal places), half away from zero.
pub fn round_paise(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_whole_half_away_from_zero() {
        assert_eq!(round_whole(dec!(24701.5)), dec!(24702));
        assert_eq!(round_whole(dec!(24701.49)), dec!(24701));
        assert_eq!(round_whole(dec!(-0.5)), dec!(-1));
    }

    #[test]
    fn test_round_paise() {
        assert_eq!(round_paise(dec!(24701.677492)), dec!(24701.68));
        assert_eq!(round_paise(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn test_envelope_metadata() {
        let out = with_metadata("test", &serde_json::json!({}), vec![], 3, dec!(1));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.metadata.computation_time_us, 3);
    }
}
