use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::step_up::StepUp;
use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::schedule::{generate_schedule, Frequency};
use crate::types::*;
use crate::NavSimResult;

/// Input for a systematic withdrawal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpInput {
    /// Lump sum converted to units at the start-date NAV
    pub initial_investment: Money,
    /// Cash withdrawn on every schedule date
    pub withdrawal_amount: Money,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Input for an SWP whose withdrawal escalates every calendar year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSwpInput {
    #[serde(flatten)]
    pub swp: SwpInput,
    /// Yearly escalation in percent (10 = +10% per year)
    pub step_up_pct: Percent,
}

/// One priced redemption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    /// Scheduled date
    pub date: NaiveDate,
    /// Date of the NAV observation used
    pub nav_date: NaiveDate,
    pub nav_used: Nav,
    pub units_redeemed: Units,
    pub amount_withdrawn: Money,
    /// Balance left after this redemption
    pub units_remaining: Units,
}

/// Outcome of an SWP simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpResult {
    pub initial_investment: Money,
    /// NAV that converted the initial investment into units
    pub start_nav: Nav,
    pub total_withdrawn: Money,
    pub remaining_units: Units,
    pub remaining_value: Money,
    /// `total_withdrawn + remaining_value`
    pub total_value: Money,
    pub latest_nav: Nav,
    pub latest_nav_date: NaiveDate,
    pub events: Vec<WithdrawalEvent>,
}

/// Outcome of a step-up SWP simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSwpResult {
    #[serde(flatten)]
    pub swp: SwpResult,
    pub step_up_pct: Percent,
    /// Withdrawal amount in force when the schedule ended or the balance ran out
    pub final_withdrawal_amount: Money,
}

/// Simulate a fixed-amount SWP over `[start_date, end_date]`.
pub fn simulate_swp(
    series: &NavSeries,
    input: &SwpInput,
) -> NavSimResult<ComputationOutput<SwpResult>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let result = redeem(series, input, |_| input.withdrawal_amount, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SWP: units bought at start NAV, redeemed at nearest earlier NAV, never below zero",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Simulate an SWP whose withdrawal escalates by `step_up_pct` each calendar year.
pub fn simulate_step_up_swp(
    series: &NavSeries,
    input: &StepUpSwpInput,
) -> NavSimResult<ComputationOutput<StepUpSwpResult>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let mut step_up = StepUp::new(
        input.swp.withdrawal_amount,
        input.swp.start_date,
        input.step_up_pct,
    )?;
    let swp = redeem(
        series,
        &input.swp,
        |date| step_up.amount_for(date),
        &mut warnings,
    )?;
    let result = StepUpSwpResult {
        swp,
        step_up_pct: input.step_up_pct,
        final_withdrawal_amount: round_money(step_up.current_amount()),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Step-up SWP: withdrawal escalated once per calendar year, never below zero units",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn redeem<F>(
    series: &NavSeries,
    input: &SwpInput,
    mut withdrawal_for: F,
    warnings: &mut Vec<String>,
) -> NavSimResult<SwpResult>
where
    F: FnMut(NaiveDate) -> Money,
{
    if input.withdrawal_amount <= Decimal::ZERO {
        return Err(NavSimError::invalid_input(
            "withdrawal_amount",
            "Withdrawal amount must be positive",
        ));
    }
    if input.initial_investment <= Decimal::ZERO {
        return Err(NavSimError::InsufficientData(
            "initial investment must be positive to buy units".into(),
        ));
    }

    let start_obs = series.resolve_on_or_before(input.start_date).ok_or_else(|| {
        NavSimError::InsufficientData(format!(
            "no NAV on or before start date {}",
            input.start_date
        ))
    })?;
    let latest = series
        .latest()
        .ok_or_else(|| NavSimError::InsufficientData("series has no usable NAV".into()))?;

    let mut remaining_units = input.initial_investment / start_obs.nav;
    let mut total_withdrawn = Decimal::ZERO;
    let mut events = Vec::new();
    let mut scheduled = 0usize;
    let mut skipped = 0usize;
    let mut depleted_on: Option<NaiveDate> = None;

    for date in generate_schedule(input.start_date, input.end_date, input.frequency) {
        if remaining_units <= Decimal::ZERO {
            break;
        }
        scheduled += 1;
        let amount = withdrawal_for(date);

        let Some(obs) = series.resolve_on_or_before(date) else {
            debug!("SWP withdrawal on {date} skipped: no NAV on or before it");
            skipped += 1;
            continue;
        };

        let wanted_units = amount / obs.nav;
        let redeemed = wanted_units.min(remaining_units);
        let withdrawn = redeemed * obs.nav;

        remaining_units -= redeemed;
        total_withdrawn += withdrawn;
        if remaining_units <= Decimal::ZERO {
            remaining_units = Decimal::ZERO;
            depleted_on = Some(date);
        }

        events.push(WithdrawalEvent {
            date,
            nav_date: obs.date,
            nav_used: obs.nav,
            units_redeemed: redeemed,
            amount_withdrawn: withdrawn,
            units_remaining: remaining_units,
        });
    }

    if skipped > 0 {
        warnings.push(format!(
            "{skipped} of {scheduled} scheduled withdrawals skipped: no NAV on or before their date"
        ));
    }
    if let Some(date) = depleted_on {
        warnings.push(format!("unit balance exhausted on {date}; later withdrawals not made"));
    }

    let remaining_value = remaining_units * latest.nav;
    let total_value = total_withdrawn + remaining_value;

    Ok(SwpResult {
        initial_investment: round_money(input.initial_investment),
        start_nav: start_obs.nav,
        total_withdrawn: round_money(total_withdrawn),
        remaining_units: round_units(remaining_units),
        remaining_value: round_money(remaining_value),
        total_value: round_money(total_value),
        latest_nav: latest.nav,
        latest_nav_date: latest.date,
        events,
    })
}
