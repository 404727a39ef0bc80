use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::calculators::returns::{period_return, PeriodReturn};
use crate::error::NavSimError;
use crate::nav::NavSeries;
use crate::types::*;
use crate::NavSimResult;

/// Look-back window ending at the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingPeriod {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl TrailingPeriod {
    pub const ALL: [TrailingPeriod; 6] = [
        TrailingPeriod::OneMonth,
        TrailingPeriod::ThreeMonths,
        TrailingPeriod::SixMonths,
        TrailingPeriod::OneYear,
        TrailingPeriod::ThreeYears,
        TrailingPeriod::FiveYears,
    ];

    pub fn months(&self) -> u32 {
        match self {
            TrailingPeriod::OneMonth => 1,
            TrailingPeriod::ThreeMonths => 3,
            TrailingPeriod::SixMonths => 6,
            TrailingPeriod::OneYear => 12,
            TrailingPeriod::ThreeYears => 36,
            TrailingPeriod::FiveYears => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrailingPeriod::OneMonth => "1m",
            TrailingPeriod::ThreeMonths => "3m",
            TrailingPeriod::SixMonths => "6m",
            TrailingPeriod::OneYear => "1y",
            TrailingPeriod::ThreeYears => "3y",
            TrailingPeriod::FiveYears => "5y",
        }
    }

    /// First day of the window ending at `as_of`.
    pub fn start_from(&self, as_of: NaiveDate) -> NavSimResult<NaiveDate> {
        as_of
            .checked_sub_months(Months::new(self.months()))
            .ok_or_else(|| {
                NavSimError::DateError(format!("{} before {as_of} is out of range", self.label()))
            })
    }
}

impl FromStr for TrailingPeriod {
    type Err = NavSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrailingPeriod::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                NavSimError::invalid_input(
                    "period",
                    format!("'{s}' is not one of 1m, 3m, 6m, 1y, 3y, 5y"),
                )
            })
    }
}

impl fmt::Display for TrailingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input for trailing-period returns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailingInput {
    /// Valuation date; defaults to the latest NAV date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Windows to compute; defaults to all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<TrailingPeriod>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailingReturn {
    pub period: TrailingPeriod,
    pub requested_start: NaiveDate,
    /// `None` when the series does not reach back far enough
    pub returns: Option<PeriodReturn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailingReturns {
    pub as_of: NaiveDate,
    pub periods: Vec<TrailingReturn>,
}

/// Returns over standard look-back windows ending at `as_of`.
pub fn trailing_returns(
    series: &NavSeries,
    input: &TrailingInput,
) -> NavSimResult<ComputationOutput<TrailingReturns>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let as_of = match input.as_of {
        Some(date) => date,
        None => {
            series
                .latest()
                .ok_or_else(|| NavSimError::InsufficientData("series has no usable NAV".into()))?
                .date
        }
    };
    if series.resolve_on_or_before(as_of).is_none() {
        return Err(NavSimError::InsufficientData(format!(
            "no NAV on or before valuation date {as_of}"
        )));
    }

    let wanted: Vec<TrailingPeriod> = input
        .periods
        .clone()
        .unwrap_or_else(|| TrailingPeriod::ALL.to_vec());

    let mut periods = Vec::with_capacity(wanted.len());
    for period in wanted {
        let requested_start = period.start_from(as_of)?;
        let returns = match period_return(series, requested_start, as_of) {
            Ok(r) => Some(r),
            Err(NavSimError::InsufficientData(reason)) => {
                warnings.push(format!("{period}: {reason}"));
                None
            }
            Err(e) => {
                warnings.push(format!("{period}: {e}"));
                None
            }
        };
        periods.push(TrailingReturn {
            period,
            requested_start,
            returns,
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trailing returns: point-to-point over calendar look-back windows",
        input,
        warnings,
        elapsed,
        TrailingReturns { as_of, periods },
    ))
}
