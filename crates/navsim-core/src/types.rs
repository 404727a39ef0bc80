use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Cash amounts (invested, withdrawn, valued).
pub type Money = Decimal;

/// Per-unit price of a scheme on a given date.
pub type Nav = Decimal;

/// Fund units held, purchased or redeemed.
pub type Units = Decimal;

/// Returns expressed in percent points (10.00 = 10%).
pub type Percent = Decimal;

/// Decimal places used when presenting money.
pub const MONEY_DP: u32 = 2;

/// Decimal places used when presenting units.
pub const UNITS_DP: u32 = 4;

/// Decimal places used when presenting percentages.
pub const PERCENT_DP: u32 = 2;

pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_units(value: Units) -> Units {
    value.round_dp_with_strategy(UNITS_DP, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_pct(value: Percent) -> Percent {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
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
    fn test_rounding_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_pct(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_units(dec!(1.23455)), dec!(1.2346));
    }
}
