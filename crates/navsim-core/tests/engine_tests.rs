use chrono::{Datelike, Months, NaiveDate};
use navsim_core::calculators::*;
use navsim_core::{Frequency, NavObservation, NavSeries, NavSimError, SchemeData};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Month-start observations with NAV rising by `step` each month, stored newest first.
fn rising(first: NaiveDate, months: u32, base: Decimal, step: Decimal) -> NavSeries {
    let mut obs: Vec<NavObservation> = (0..months)
        .map(|i| {
            NavObservation::new(
                first.checked_add_months(Months::new(i)).unwrap(),
                base + step * Decimal::from(i),
            )
        })
        .collect();
    obs.reverse();
    NavSeries::new(obs)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

#[test]
fn test_resolver_picks_nearest_earlier_observation() {
    let series = NavSeries::new(vec![
        NavObservation::new(d(2023, 1, 15), dec!(12)),
        NavObservation::new(d(2023, 1, 1), dec!(10)),
    ]);
    assert_eq!(
        series.resolve_on_or_before(d(2023, 1, 10)),
        Some(&NavObservation::new(d(2023, 1, 1), dec!(10)))
    );
    assert_eq!(series.resolve_on_or_before(d(2022, 12, 31)), None);
}

// ---------------------------------------------------------------------------
// Period returns
// ---------------------------------------------------------------------------

#[test]
fn test_simple_return_ten_percent_and_flat() {
    let series = NavSeries::new(vec![
        NavObservation::new(d(2023, 1, 1), dec!(100)),
        NavObservation::new(d(2023, 7, 1), dec!(110)),
    ]);
    let up = compute_returns(
        &series,
        &PeriodReturnInput {
            start_date: d(2023, 1, 1),
            end_date: d(2023, 7, 1),
        },
    )
    .unwrap();
    assert_eq!(up.result.simple_return_pct, dec!(10.00));

    let flat = NavSeries::new(vec![
        NavObservation::new(d(2023, 1, 1), dec!(100)),
        NavObservation::new(d(2023, 7, 1), dec!(100)),
    ]);
    let r = period_return(&flat, d(2023, 1, 1), d(2023, 7, 1)).unwrap();
    assert_eq!(r.simple_return_pct, Decimal::ZERO);
    assert_eq!(r.annualized_return_pct, Some(Decimal::ZERO));
}

#[test]
fn test_annualisation_threshold_is_thirty_days() {
    let series = NavSeries::new(vec![
        NavObservation::new(d(2023, 3, 1), dec!(100)),
        NavObservation::new(d(2023, 3, 30), dec!(101)),
        NavObservation::new(d(2023, 3, 31), dec!(102)),
    ]);
    let short = period_return(&series, d(2023, 3, 1), d(2023, 3, 30)).unwrap();
    assert_eq!(short.days_elapsed, 29);
    assert_eq!(short.annualized_return_pct, None);

    let long = period_return(&series, d(2023, 3, 1), d(2023, 3, 31)).unwrap();
    assert_eq!(long.days_elapsed, 30);
    assert!(long.annualized_return_pct.is_some());
}

// ---------------------------------------------------------------------------
// SIP
// ---------------------------------------------------------------------------

#[test]
fn test_sip_on_rising_nav_buys_fewer_units_each_month() {
    let series = rising(d(2023, 1, 1), 12, dec!(10), dec!(0.5));
    let input = SipInput {
        amount: dec!(1000),
        frequency: Frequency::Monthly,
        start_date: d(2023, 1, 1),
        end_date: d(2023, 12, 1),
    };
    let r = simulate_sip(&series, &input).unwrap().result;

    assert_eq!(r.total_invested, dec!(12000));
    assert_eq!(r.events.len(), 12);
    assert!(r
        .events
        .windows(2)
        .all(|w| w[1].units_purchased < w[0].units_purchased));
    assert!(r.current_value > r.total_invested);
}

#[test]
fn test_quarterly_sip_clamps_month_end() {
    let series = rising(d(2023, 1, 1), 14, dec!(10), dec!(0.1));
    let input = SipInput {
        amount: dec!(500),
        frequency: Frequency::Quarterly,
        start_date: d(2023, 1, 31),
        end_date: d(2023, 12, 31),
    };
    let r = simulate_sip(&series, &input).unwrap().result;
    let dates: Vec<NaiveDate> = r.events.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![d(2023, 1, 31), d(2023, 4, 30), d(2023, 7, 31), d(2023, 10, 31)]
    );
    assert_eq!(r.total_invested, dec!(2000));
}

#[test]
fn test_unknown_frequency_is_invalid_frequency() {
    let err = "fortnightly".parse::<Frequency>().unwrap_err();
    assert!(matches!(err, NavSimError::InvalidFrequency(_)));
}

// ---------------------------------------------------------------------------
// Step-up
// ---------------------------------------------------------------------------

#[test]
fn test_step_up_sip_compounds_once_per_calendar_year() {
    let series = rising(d(2022, 6, 1), 24, dec!(20), dec!(0.2));
    let input = StepUpSipInput {
        sip: SipInput {
            amount: dec!(1000),
            frequency: Frequency::Monthly,
            start_date: d(2022, 6, 1),
            end_date: d(2024, 5, 1),
        },
        step_up_pct: dec!(10),
    };
    let r = simulate_step_up_sip(&series, &input).unwrap().result;

    for event in &r.sip.events {
        let expected = match event.date.year() {
            2022 => dec!(1000),
            2023 => dec!(1100),
            _ => dec!(1210),
        };
        assert_eq!(event.amount_invested, expected, "installment on {}", event.date);
    }
    assert_eq!(r.final_installment_amount, dec!(1210));
    // 7 x 1000 + 12 x 1100 + 5 x 1210
    assert_eq!(r.sip.total_invested, dec!(26250));
}

// ---------------------------------------------------------------------------
// SWP
// ---------------------------------------------------------------------------

#[test]
fn test_swp_balance_never_negative() {
    let series = rising(d(2023, 1, 1), 24, dec!(10), dec!(-0.2));
    for withdrawal in [dec!(100), dec!(1500), dec!(25000)] {
        let input = SwpInput {
            initial_investment: dec!(20000),
            withdrawal_amount: withdrawal,
            frequency: Frequency::Monthly,
            start_date: d(2023, 1, 1),
            end_date: d(2024, 12, 1),
        };
        let r = simulate_swp(&series, &input).unwrap().result;
        assert!(r.events.iter().all(|e| e.units_remaining >= Decimal::ZERO));
        assert!(r.remaining_units >= Decimal::ZERO);
        assert!(r.total_withdrawn <= dec!(20000));
    }
}

#[test]
fn test_step_up_swp_depletes_without_going_negative() {
    let series = rising(d(2023, 1, 1), 36, dec!(10), Decimal::ZERO);
    let input = StepUpSwpInput {
        swp: SwpInput {
            initial_investment: dec!(30000),
            withdrawal_amount: dec!(1000),
            frequency: Frequency::Monthly,
            start_date: d(2023, 1, 1),
            end_date: d(2025, 12, 1),
        },
        step_up_pct: dec!(50),
    };
    let out = simulate_step_up_swp(&series, &input).unwrap();
    let r = out.result;
    assert_eq!(r.swp.remaining_units, Decimal::ZERO);
    assert_eq!(r.swp.total_withdrawn, dec!(30000));
    assert!(out.warnings.iter().any(|w| w.contains("exhausted")));
}

// ---------------------------------------------------------------------------
// Lumpsum
// ---------------------------------------------------------------------------

#[test]
fn test_lumpsum_matches_period_return() {
    let series = NavSeries::new(vec![
        NavObservation::new(d(2019, 4, 1), dec!(23.4567)),
        NavObservation::new(d(2021, 9, 15), dec!(28.9012)),
        NavObservation::new(d(2024, 2, 29), dec!(41.3378)),
    ]);
    for (from, to) in [
        (d(2019, 4, 1), d(2024, 3, 1)),
        (d(2020, 1, 1), d(2021, 9, 30)),
        (d(2021, 9, 15), d(2021, 9, 20)),
    ] {
        let lump = simulate_lumpsum(
            &series,
            &LumpsumInput {
                amount: dec!(100000),
                start_date: from,
                end_date: to,
            },
        )
        .unwrap()
        .result;
        let period = period_return(&series, from, to).unwrap();
        assert_eq!(lump.absolute_return_pct, period.simple_return_pct);
        assert_eq!(lump.annualized_return_pct, period.annualized_return_pct);
    }
}

// ---------------------------------------------------------------------------
// Upstream payload
// ---------------------------------------------------------------------------

#[test]
fn test_mfapi_payload_feeds_calculators() {
    let json = r#"{
        "meta": {
            "fund_house": "Example AMC",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Equity Scheme - Large Cap Fund",
            "scheme_code": 120503,
            "scheme_name": "Example Bluechip Fund - Direct Growth"
        },
        "data": [
            {"date": "02-01-2024", "nav": "55.00000"},
            {"date": "not-a-date", "nav": "54.00000"},
            {"date": "02-01-2023", "nav": "50.00000"}
        ],
        "status": "SUCCESS"
    }"#;
    let scheme = SchemeData::from_mfapi_json(json).unwrap();
    assert_eq!(scheme.meta.scheme_code, "120503");
    assert_eq!(scheme.series.len(), 2);

    let r = period_return(&scheme.series, d(2023, 1, 2), d(2024, 1, 2)).unwrap();
    assert_eq!(r.simple_return_pct, dec!(10));
}
