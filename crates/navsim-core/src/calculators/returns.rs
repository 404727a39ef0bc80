use chrono::NaiveDate;
use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::types::*;
use crate::NavSimResult;

/// Days per year used for every annualisation in the engine
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Shortest period, in days, for which a period return is annualised
pub const MIN_ANNUALIZATION_DAYS: i64 = 30;

/// Input for a point-to-point return calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReturnInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Return between two dates, priced at the nearest earlier NAVs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// Date of the observation that priced the start
    pub start_date: NaiveDate,
    /// Date of the observation that priced the end
    pub end_date: NaiveDate,
    pub start_nav: Nav,
    pub end_nav: Nav,
    /// Requested end minus resolved start
    pub days_elapsed: i64,
    pub simple_return_pct: Percent,
    /// `None` below 30 days: not computed, which is different from zero
    pub annualized_return_pct: Option<Percent>,
}

/// Simple and annualised return of a scheme between two dates.
pub fn compute_returns(
    series: &NavSeries,
    input: &PeriodReturnInput,
) -> NavSimResult<ComputationOutput<PeriodReturn>> {
    let start = Instant::now();

    let output = period_return(series, input.start_date, input.end_date)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Point-to-point NAV return (nearest earlier NAV; annualised from 30 days, 365.25-day year)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Envelope-free period return shared by lumpsum, trailing and peer figures.
pub fn period_return(
    series: &NavSeries,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> NavSimResult<PeriodReturn> {
    let start_obs = series.resolve_on_or_before(start_date).ok_or_else(|| {
        NavSimError::InsufficientData(format!("no NAV on or before start date {start_date}"))
    })?;
    let end_obs = series.resolve_on_or_before(end_date).ok_or_else(|| {
        NavSimError::InsufficientData(format!("no NAV on or before end date {end_date}"))
    })?;

    let simple = (end_obs.nav - start_obs.nav)
        .checked_div(start_obs.nav)
        .and_then(|r| r.checked_mul(dec!(100)))
        .unwrap_or(Decimal::MAX);

    let days_elapsed = (end_date - start_obs.date).num_days();
    let annualized = if days_elapsed >= MIN_ANNUALIZATION_DAYS {
        let years = Decimal::from(days_elapsed) / DAYS_PER_YEAR;
        Some(round_pct(annualized_pct(
            end_obs.nav / start_obs.nav,
            years,
            "period return annualisation",
        )?))
    } else {
        None
    };

    Ok(PeriodReturn {
        start_date: start_obs.date,
        end_date: end_obs.date,
        start_nav: start_obs.nav,
        end_nav: end_obs.nav,
        days_elapsed,
        simple_return_pct: round_pct(simple),
        annualized_return_pct: annualized,
    })
}

/// Year fraction between two calendar dates on a 365.25-day year.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days()) / DAYS_PER_YEAR
}

/// `(growth^(1/years) - 1) * 100`, unrounded. `years` must be positive.
///
/// Never overflows: a figure too large for a `Decimal` saturates at
/// `Decimal::MAX` so the caller still gets its totals.
pub fn annualized_pct(growth: Decimal, years: Decimal, context: &str) -> NavSimResult<Percent> {
    if years <= Decimal::ZERO {
        return Err(NavSimError::DivisionByZero {
            context: format!("{context}: non-positive year fraction"),
        });
    }
    if growth == Decimal::ONE {
        return Ok(Decimal::ZERO);
    }
    if growth.is_zero() {
        return Ok(dec!(-100));
    }
    if growth < Decimal::ZERO {
        return Err(NavSimError::invalid_input(
            "growth",
            format!("{context}: growth factor {growth} is negative"),
        ));
    }
    let exponent = Decimal::ONE / years;
    let factor = match growth.checked_powd(exponent) {
        Some(factor) => factor,
        None => {
            debug!("{context}: {growth}^{exponent} outside decimal range, using f64");
            powf_saturating(growth, exponent)
        }
    };
    Ok(factor
        .checked_sub(Decimal::ONE)
        .and_then(|gain| gain.checked_mul(dec!(100)))
        .unwrap_or(Decimal::MAX))
}

/// `growth^exponent` in f64, clamped to `Decimal::MAX` when unrepresentable.
/// Only reached for very short spans with large growth, where precision no
/// longer matters.
fn powf_saturating(growth: Decimal, exponent: Decimal) -> Decimal {
    let value = match (growth.to_f64(), exponent.to_f64()) {
        (Some(g), Some(e)) => g.powf(e),
        _ => f64::INFINITY,
    };
    if value.is_finite() {
        Decimal::from_f64(value).unwrap_or(if value < 1.0 {
            Decimal::ZERO
        } else {
            Decimal::MAX
        })
    } else {
        Decimal::MAX
    }
}
