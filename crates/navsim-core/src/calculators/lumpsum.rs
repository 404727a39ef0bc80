use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::returns::period_return;
use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::types::*;
use crate::NavSimResult;

/// Input for a one-time investment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpsumInput {
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Value of a one-time investment at the end of the period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpsumResult {
    pub invested: Money,
    pub current_value: Money,
    pub absolute_return_pct: Percent,
    /// Same figure as the period return; independent of the amount
    pub annualized_return_pct: Option<Percent>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_nav: Nav,
    pub end_nav: Nav,
}

/// Grow `amount` by the NAV ratio between the two resolved dates.
pub fn simulate_lumpsum(
    series: &NavSeries,
    input: &LumpsumInput,
) -> NavSimResult<ComputationOutput<LumpsumResult>> {
    let start = Instant::now();

    if input.amount <= Decimal::ZERO {
        return Err(NavSimError::invalid_input(
            "amount",
            "Lumpsum amount must be positive",
        ));
    }

    let period = period_return(series, input.start_date, input.end_date)?;
    let current_value = input.amount * period.end_nav / period.start_nav;
    let absolute = (current_value - input.amount) / input.amount * dec!(100);

    let result = LumpsumResult {
        invested: round_money(input.amount),
        current_value: round_money(current_value),
        absolute_return_pct: round_pct(absolute),
        annualized_return_pct: period.annualized_return_pct,
        start_date: period.start_date,
        end_date: period.end_date,
        start_nav: period.start_nav,
        end_nav: period.end_nav,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lumpsum: amount scaled by end/start NAV; annualised return from the period return",
        input,
        Vec::new(),
        elapsed,
        result,
    ))
}
