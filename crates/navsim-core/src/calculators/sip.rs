use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::returns::{annualized_pct, years_between};
use super::step_up::StepUp;
use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::schedule::{generate_schedule, Frequency};
use crate::types::*;
use crate::NavSimResult;

/// Input for a systematic investment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    /// Cash invested on every schedule date
    pub amount: Money,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Input for an SIP whose installment escalates every calendar year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSipInput {
    #[serde(flatten)]
    pub sip: SipInput,
    /// Yearly escalation in percent (10 = +10% per year)
    pub step_up_pct: Percent,
}

/// One priced installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentEvent {
    /// Scheduled date
    pub date: NaiveDate,
    /// Date of the NAV observation used
    pub nav_date: NaiveDate,
    pub nav_used: Nav,
    pub amount_invested: Money,
    pub units_purchased: Units,
}

/// Outcome of an SIP simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipResult {
    pub total_invested: Money,
    pub current_value: Money,
    pub total_units: Units,
    pub absolute_return_pct: Percent,
    pub annualized_return_pct: Percent,
    /// NAV used to value the accumulated units
    pub latest_nav: Nav,
    pub latest_nav_date: NaiveDate,
    pub events: Vec<InvestmentEvent>,
}

/// Outcome of a step-up SIP simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpSipResult {
    #[serde(flatten)]
    pub sip: SipResult,
    pub step_up_pct: Percent,
    /// Installment amount in force on the last schedule date
    pub final_installment_amount: Money,
}

/// Plain SIPs annualise over any positive period; step-up SIPs only from a
/// full year, reporting the absolute return below that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annualization {
    AnyPositivePeriod,
    FullYearOrAbsolute,
}

#[derive(Debug, Default)]
struct Accumulation {
    total_invested: Money,
    total_units: Units,
    events: Vec<InvestmentEvent>,
    scheduled: usize,
    skipped: usize,
}

/// Simulate a fixed-amount SIP over `[start_date, end_date]`.
pub fn simulate_sip(
    series: &NavSeries,
    input: &SipInput,
) -> NavSimResult<ComputationOutput<SipResult>> {
    let start = Instant::now();
    validate_sip(input)?;

    let acc = accumulate(series, input, |_| input.amount);
    let mut warnings = Vec::new();
    push_skip_warning(&mut warnings, &acc);

    let result = summarise(series, input, acc, Annualization::AnyPositivePeriod)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP: units bought at nearest earlier NAV, valued at latest NAV; CAGR over schedule span",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Simulate an SIP whose installment escalates by `step_up_pct` each calendar year.
pub fn simulate_step_up_sip(
    series: &NavSeries,
    input: &StepUpSipInput,
) -> NavSimResult<ComputationOutput<StepUpSipResult>> {
    let start = Instant::now();
    validate_sip(&input.sip)?;

    let mut step_up = StepUp::new(input.sip.amount, input.sip.start_date, input.step_up_pct)?;
    let acc = accumulate(series, &input.sip, |date| step_up.amount_for(date));
    let final_installment_amount = round_money(step_up.current_amount());

    let mut warnings = Vec::new();
    push_skip_warning(&mut warnings, &acc);

    let sip = summarise(series, &input.sip, acc, Annualization::FullYearOrAbsolute)?;
    let result = StepUpSipResult {
        sip,
        step_up_pct: input.step_up_pct,
        final_installment_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Step-up SIP: installment escalated once per calendar year; CAGR only from one full year",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn validate_sip(input: &SipInput) -> NavSimResult<()> {
    if input.amount <= Decimal::ZERO {
        return Err(NavSimError::invalid_input(
            "amount",
            "Installment amount must be positive",
        ));
    }
    Ok(())
}

fn accumulate<F>(series: &NavSeries, input: &SipInput, mut amount_for: F) -> Accumulation
where
    F: FnMut(NaiveDate) -> Money,
{
    let mut acc = Accumulation::default();

    for date in generate_schedule(input.start_date, input.end_date, input.frequency) {
        acc.scheduled += 1;
        let amount = amount_for(date);

        let Some(obs) = series.resolve_on_or_before(date) else {
            debug!("SIP installment on {date} skipped: no NAV on or before it");
            acc.skipped += 1;
            continue;
        };

        let units = amount / obs.nav;
        acc.total_units += units;
        acc.total_invested += amount;
        acc.events.push(InvestmentEvent {
            date,
            nav_date: obs.date,
            nav_used: obs.nav,
            amount_invested: amount,
            units_purchased: units,
        });
    }

    acc
}

fn summarise(
    series: &NavSeries,
    input: &SipInput,
    acc: Accumulation,
    annualization: Annualization,
) -> NavSimResult<SipResult> {
    let latest = series
        .latest()
        .ok_or_else(|| NavSimError::InsufficientData("series has no usable NAV".into()))?;

    if acc.total_invested.is_zero() {
        return Err(NavSimError::InsufficientData(format!(
            "none of {} scheduled installments matched a NAV",
            acc.scheduled
        )));
    }

    let current_value = acc.total_units * latest.nav;
    let absolute = (current_value - acc.total_invested) / acc.total_invested * dec!(100);
    let growth = current_value / acc.total_invested;
    let years = years_between(input.start_date, input.end_date);

    let annualized = match annualization {
        Annualization::AnyPositivePeriod if years > Decimal::ZERO => {
            annualized_pct(growth, years, "SIP annualisation")?
        }
        Annualization::AnyPositivePeriod => Decimal::ZERO,
        Annualization::FullYearOrAbsolute if years >= Decimal::ONE => {
            annualized_pct(growth, years, "step-up SIP annualisation")?
        }
        Annualization::FullYearOrAbsolute => absolute,
    };

    Ok(SipResult {
        total_invested: round_money(acc.total_invested),
        current_value: round_money(current_value),
        total_units: round_units(acc.total_units),
        absolute_return_pct: round_pct(absolute),
        annualized_return_pct: round_pct(annualized),
        latest_nav: latest.nav,
        latest_nav_date: latest.date,
        events: acc.events,
    })
}

fn push_skip_warning(warnings: &mut Vec<String>, acc: &Accumulation) {
    if acc.skipped > 0 {
        warnings.push(format!(
            "{} of {} scheduled installments skipped: no NAV on or before their date",
            acc.skipped, acc.scheduled
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavObservation;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// NAV 10, 11, 12, ... on the first of each month from Jan 2023.
    fn rising_monthly(months: u32) -> NavSeries {
        (0..months)
            .map(|i| {
                let date = d(2023, 1, 1)
                    .checked_add_months(chrono::Months::new(i))
                    .unwrap();
                NavObservation::new(date, dec!(10) + Decimal::from(i))
            })
            .collect()
    }

    fn sip(amount: Decimal, start: NaiveDate, end: NaiveDate) -> SipInput {
        SipInput {
            amount,
            frequency: Frequency::Monthly,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_twelve_installments_invest_twelve_thousand() {
        let series = rising_monthly(12);
        let out = simulate_sip(&series, &sip(dec!(1000), d(2023, 1, 1), d(2023, 12, 1))).unwrap();
        let r = out.result;
        assert_eq!(r.total_invested, dec!(12000));
        assert_eq!(r.events.len(), 12);
        assert_eq!(r.latest_nav, dec!(21));
        for pair in r.events.windows(2) {
            assert!(pair[1].units_purchased < pair[0].units_purchased);
        }
        assert!(r.absolute_return_pct > Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_short_span_with_large_growth_still_reports_totals() {
        let series = NavSeries::new(vec![
            NavObservation::new(d(2024, 1, 1), dec!(40)),
            NavObservation::new(d(2020, 1, 1), dec!(10)),
        ]);
        let out = simulate_sip(&series, &sip(dec!(1000), d(2020, 1, 1), d(2020, 1, 5))).unwrap();
        let r = out.result;
        assert_eq!(r.events.len(), 1);
        assert_eq!(r.total_units, dec!(100));
        assert_eq!(r.current_value, dec!(4000));
        assert_eq!(r.absolute_return_pct, dec!(300));
        assert_eq!(r.annualized_return_pct, Decimal::MAX);
    }

    #[test]
    fn test_current_value_uses_latest_nav() {
        let series = NavSeries::new(vec![
            NavObservation::new(d(2023, 1, 1), dec!(10)),
            NavObservation::new(d(2023, 2, 1), dec!(20)),
        ]);
        let r = simulate_sip(&series, &sip(dec!(100), d(2023, 1, 1), d(2023, 1, 1)))
            .unwrap()
            .result;
        assert_eq!(r.total_units, dec!(10));
        assert_eq!(r.current_value, dec!(200));
        assert_eq!(r.absolute_return_pct, dec!(100));
        // Zero-length span: annualised return falls back to zero.
        assert_eq!(r.annualized_return_pct, Decimal::ZERO);
    }

    #[test]
    fn test_installments_before_data_are_skipped() {
        let series = NavSeries::new(vec![NavObservation::new(d(2023, 3, 1), dec!(10))]);
        let out = simulate_sip(&series, &sip(dec!(500), d(2023, 1, 1), d(2023, 4, 1))).unwrap();
        assert_eq!(out.result.events.len(), 2);
        assert_eq!(out.result.total_invested, dec!(1000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_no_matching_nav_is_insufficient_data() {
        let series = NavSeries::new(vec![NavObservation::new(d(2024, 1, 1), dec!(10))]);
        let err = simulate_sip(&series, &sip(dec!(500), d(2023, 1, 1), d(2023, 6, 1))).unwrap_err();
        assert!(matches!(err, NavSimError::InsufficientData(_)));
    }

    #[test]
    fn test_empty_series_is_insufficient_data() {
        let err = simulate_sip(&NavSeries::default(), &sip(dec!(500), d(2023, 1, 1), d(2023, 6, 1)))
            .unwrap_err();
        assert!(matches!(err, NavSimError::InsufficientData(_)));
    }

    #[test]
    fn test_start_after_end_is_insufficient_data() {
        let series = rising_monthly(12);
        let err = simulate_sip(&series, &sip(dec!(500), d(2023, 6, 1), d(2023, 1, 1))).unwrap_err();
        assert!(matches!(err, NavSimError::InsufficientData(_)));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let series = rising_monthly(12);
        let input = sip(Decimal::ZERO, d(2023, 1, 1), d(2023, 6, 1));
        let err = simulate_sip(&series, &input).unwrap_err();
        assert!(matches!(err, NavSimError::InvalidInput { .. }));
    }

    #[test]
    fn test_step_up_below_one_year_reports_absolute() {
        let series = rising_monthly(12);
        let input = StepUpSipInput {
            sip: sip(dec!(1000), d(2023, 1, 1), d(2023, 6, 1)),
            step_up_pct: dec!(10),
        };
        let r = simulate_step_up_sip(&series, &input).unwrap().result;
        assert_eq!(r.sip.annualized_return_pct, r.sip.absolute_return_pct);
        assert_eq!(r.final_installment_amount, dec!(1000));
    }

    #[test]
    fn test_step_up_escalates_across_years() {
        let series: NavSeries = (0..36)
            .map(|i| {
                let date = d(2022, 1, 1).checked_add_months(chrono::Months::new(i)).unwrap();
                NavObservation::new(date, dec!(50))
            })
            .collect();
        let input = StepUpSipInput {
            sip: sip(dec!(1000), d(2022, 1, 1), d(2024, 12, 1)),
            step_up_pct: dec!(10),
        };
        let r = simulate_step_up_sip(&series, &input).unwrap().result;
        let amounts: Vec<Decimal> = r.sip.events.iter().map(|e| e.amount_invested).collect();
        assert!(amounts[..12].iter().all(|a| *a == dec!(1000)));
        assert!(amounts[12..24].iter().all(|a| *a == dec!(1100)));
        assert!(amounts[24..].iter().all(|a| *a == dec!(1210)));
        assert_eq!(r.sip.total_invested, dec!(39720));
        assert_eq!(r.final_installment_amount, dec!(1210));
        // Flat NAV: no gain, so a zero CAGR over the ~3-year span.
        assert_eq!(r.sip.annualized_return_pct, Decimal::ZERO);
    }
}
