use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Instant;

use crate::calculators::returns::period_return;
use crate::error::NavSimError;
use crate::nav::SchemeData;
use crate::types::*;
use crate::NavSimResult;

/// Schemes with a shorter history are left out of the ranking
pub const MIN_OBSERVATIONS: usize = 50;

/// Default number of ranked rows returned
pub const DEFAULT_LIMIT: usize = 25;

/// Screening rule applied before ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeerFilter {
    #[default]
    All,
    /// 1Y return above 8%
    HighReturns,
    /// Between 3 and 5 years old
    #[serde(rename = "3-years")]
    ThreeYears,
    /// At least 10 years old
    #[serde(rename = "10-years")]
    TenYears,
    /// 1Y return above 15%
    TopPerformers,
}

impl PeerFilter {
    fn accepts(&self, row: &PeerRow) -> bool {
        match self {
            PeerFilter::All => true,
            PeerFilter::HighReturns => row.returns_1y.is_some_and(|r| r > dec!(8)),
            PeerFilter::ThreeYears => (3..=5).contains(&row.age_years),
            PeerFilter::TenYears => row.age_years >= 10,
            PeerFilter::TopPerformers => row.returns_1y.is_some_and(|r| r > dec!(15)),
        }
    }
}

impl FromStr for PeerFilter {
    type Err = NavSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PeerFilter::All),
            "high-returns" => Ok(PeerFilter::HighReturns),
            "3-years" => Ok(PeerFilter::ThreeYears),
            "10-years" => Ok(PeerFilter::TenYears),
            "top-performers" => Ok(PeerFilter::TopPerformers),
            other => Err(NavSimError::invalid_input(
                "filter",
                format!("unknown filter '{other}'"),
            )),
        }
    }
}

/// Input for a peer ranking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerComparisonInput {
    /// Valuation date; defaults to each scheme's latest NAV date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub filter: PeerFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRow {
    pub scheme_code: String,
    pub scheme_name: String,
    pub fund_house: String,
    pub category: String,
    pub latest_nav: Nav,
    pub as_of: NaiveDate,
    pub returns_1y: Option<Percent>,
    pub returns_3y: Option<Percent>,
    /// Whole years since the first usable observation
    pub age_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerComparison {
    pub filter: PeerFilter,
    pub count: usize,
    pub schemes: Vec<PeerRow>,
}

/// Rank schemes by 1-year return after screening.
pub fn compare_peers(
    schemes: &[SchemeData],
    input: &PeerComparisonInput,
) -> NavSimResult<ComputationOutput<PeerComparison>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let mut rows = Vec::new();
    for scheme in schemes {
        let code = &scheme.meta.scheme_code;
        if scheme.series.len() < MIN_OBSERVATIONS {
            warnings.push(format!(
                "{code}: only {} observations, need {MIN_OBSERVATIONS}",
                scheme.series.len()
            ));
            continue;
        }
        match peer_row(scheme, input.as_of) {
            Ok(Some(row)) => {
                if input.filter.accepts(&row) {
                    rows.push(row);
                }
            }
            Ok(None) => warnings.push(format!("{code}: no NAV on or before valuation date")),
            Err(e) => warnings.push(format!("{code}: skipped, {e}")),
        }
    }

    rows.sort_by(|a, b| descending_nulls_last(a.returns_1y, b.returns_1y));
    rows.truncate(input.limit.unwrap_or(DEFAULT_LIMIT));

    let result = PeerComparison {
        filter: input.filter,
        count: rows.len(),
        schemes: rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Peer comparison: 1Y/3Y point-to-point returns, ranked by 1Y descending",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn peer_row(scheme: &SchemeData, as_of: Option<NaiveDate>) -> NavSimResult<Option<PeerRow>> {
    let series = &scheme.series;
    let valuation = match as_of {
        Some(date) => series.resolve_on_or_before(date),
        None => series.latest(),
    };
    let (Some(valuation), Some(first)) = (valuation, series.earliest()) else {
        return Ok(None);
    };
    let as_of = as_of.unwrap_or(valuation.date);

    let returns_1y = trailing_simple(scheme, as_of, 12)?;
    let returns_3y = trailing_simple(scheme, as_of, 36)?;

    Ok(Some(PeerRow {
        scheme_code: scheme.meta.scheme_code.clone(),
        scheme_name: scheme.meta.scheme_name.clone(),
        fund_house: scheme.meta.fund_house.clone(),
        category: scheme.meta.scheme_category.clone(),
        latest_nav: valuation.nav,
        as_of,
        returns_1y,
        returns_3y,
        age_years: whole_years_between(first.date, as_of),
    }))
}

fn trailing_simple(
    scheme: &SchemeData,
    as_of: NaiveDate,
    months: u32,
) -> NavSimResult<Option<Percent>> {
    let Some(from) = as_of.checked_sub_months(Months::new(months)) else {
        return Ok(None);
    };
    match period_return(&scheme.series, from, as_of) {
        Ok(r) => Ok(Some(r.simple_return_pct)),
        Err(NavSimError::InsufficientData(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn whole_years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

fn descending_nulls_last(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
