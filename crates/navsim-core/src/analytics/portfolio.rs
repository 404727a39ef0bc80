use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::types::*;
use crate::NavSimResult;

/// A position in one scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub scheme_code: String,
    #[serde(default)]
    pub scheme_name: String,
    pub units: Units,
    /// Average purchase NAV
    pub avg_price: Nav,
    /// Overrides `units * avg_price` when the cost basis is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invested_amount: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub scheme_code: String,
    pub scheme_name: String,
    pub units: Units,
    pub invested: Money,
    pub latest_nav: Nav,
    pub nav_date: NaiveDate,
    pub current_value: Money,
    pub gain_loss: Money,
    pub gain_loss_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub total_invested: Money,
    pub total_value: Money,
    pub total_gain_loss: Money,
    pub total_gain_loss_pct: Percent,
    pub holdings: Vec<HoldingValuation>,
}

/// Value each holding at its scheme's latest NAV and total the book.
pub fn value_portfolio(
    input: &PortfolioInput,
    navs: &HashMap<String, NavSeries>,
) -> NavSimResult<ComputationOutput<PortfolioValuation>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    for h in &input.holdings {
        if h.units <= Decimal::ZERO {
            return Err(NavSimError::invalid_input(
                "units",
                format!("{}: units must be positive", h.scheme_code),
            ));
        }
        if h.avg_price <= Decimal::ZERO {
            return Err(NavSimError::invalid_input(
                "avg_price",
                format!("{}: average price must be positive", h.scheme_code),
            ));
        }
    }

    let mut holdings = Vec::with_capacity(input.holdings.len());
    let mut total_invested = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;

    for h in &input.holdings {
        let Some(latest) = navs.get(&h.scheme_code).and_then(NavSeries::latest) else {
            warnings.push(format!("{}: no NAV available, holding skipped", h.scheme_code));
            continue;
        };

        let invested = h.invested_amount.unwrap_or(h.units * h.avg_price);
        let current_value = h.units * latest.nav;
        let gain_loss = current_value - invested;

        total_invested += invested;
        total_value += current_value;

        holdings.push(HoldingValuation {
            scheme_code: h.scheme_code.clone(),
            scheme_name: h.scheme_name.clone(),
            units: h.units,
            invested: round_money(invested),
            latest_nav: latest.nav,
            nav_date: latest.date,
            current_value: round_money(current_value),
            gain_loss: round_money(gain_loss),
            gain_loss_pct: round_pct(pct_of(gain_loss, invested)),
        });
    }

    let total_gain_loss = total_value - total_invested;
    let result = PortfolioValuation {
        total_invested: round_money(total_invested),
        total_value: round_money(total_value),
        total_gain_loss: round_money(total_gain_loss),
        total_gain_loss_pct: round_pct(pct_of(total_gain_loss, total_invested)),
        holdings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio: units marked at latest NAV against cost basis",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn pct_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * dec!(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavObservation;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn holding(code: &str, units: Decimal, avg: Decimal) -> Holding {
        Holding {
            scheme_code: code.into(),
            scheme_name: String::new(),
            units,
            avg_price: avg,
            invested_amount: None,
        }
    }

    fn navs() -> HashMap<String, NavSeries> {
        let mut map = HashMap::new();
        map.insert(
            "100".to_string(),
            NavSeries::new(vec![
                NavObservation::new(d(2024, 1, 1), dec!(40)),
                NavObservation::new(d(2024, 6, 3), dec!(50)),
            ]),
        );
        map.insert(
            "200".to_string(),
            NavSeries::new(vec![NavObservation::new(d(2024, 6, 3), dec!(18))]),
        );
        map
    }

    #[test]
    fn test_values_and_totals() {
        let input = PortfolioInput {
            holdings: vec![holding("100", dec!(100), dec!(40)), holding("200", dec!(50), dec!(20))],
        };
        let out = value_portfolio(&input, &navs()).unwrap();
        let r = out.result;
        assert_eq!(r.holdings[0].current_value, dec!(5000));
        assert_eq!(r.holdings[0].gain_loss_pct, dec!(25));
        assert_eq!(r.holdings[1].gain_loss, dec!(-100));
        assert_eq!(r.total_invested, dec!(5000));
        assert_eq!(r.total_value, dec!(5900));
        assert_eq!(r.total_gain_loss_pct, dec!(18));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_missing_series_is_skipped() {
        let input = PortfolioInput {
            holdings: vec![holding("100", dec!(10), dec!(40)), holding("999", dec!(10), dec!(10))],
        };
        let out = value_portfolio(&input, &navs()).unwrap();
        assert_eq!(out.result.holdings.len(), 1);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_invested_amount_overrides_cost() {
        let mut h = holding("100", dec!(10), dec!(40));
        h.invested_amount = Some(dec!(450));
        let out = value_portfolio(&PortfolioInput { holdings: vec![h] }, &navs()).unwrap();
        assert_eq!(out.result.holdings[0].gain_loss, dec!(50));
    }

    #[test]
    fn test_non_positive_units_rejected() {
        let input = PortfolioInput {
            holdings: vec![holding("100", Decimal::ZERO, dec!(40))],
        };
        assert!(matches!(
            value_portfolio(&input, &navs()).unwrap_err(),
            NavSimError::InvalidInput { .. }
        ));
    }
}
