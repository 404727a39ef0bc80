use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::NavSimError;

/// How often an SIP installment or SWP withdrawal falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Calendar months between two consecutive schedule dates
    pub fn step_months(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Yearly => 12,
        }
    }
}

impl FromStr for Frequency {
    type Err = NavSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" | "annual" | "annually" => Ok(Frequency::Yearly),
            _ => Err(NavSimError::InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// Dates `start, start + step, start + 2*step, ...` up to and including `end`.
///
/// Each date is offset from the anchor rather than from its predecessor, and
/// chrono clamps to the last day of a short month: a 31 Jan anchor yields
/// 28/29 Feb, then 31 Mar.
#[derive(Debug, Clone)]
pub struct Schedule {
    anchor: NaiveDate,
    end: NaiveDate,
    step_months: u32,
    index: u32,
    exhausted: bool,
}

impl Iterator for Schedule {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.exhausted {
            return None;
        }
        let offset = self.step_months.checked_mul(self.index);
        let date = offset.and_then(|m| self.anchor.checked_add_months(Months::new(m)));
        match date {
            Some(date) if date <= self.end => {
                self.index += 1;
                Some(date)
            }
            _ => {
                self.exhausted = true;
                None
            }
        }
    }
}

/// Build the schedule for `[start, end]`. Empty when `start > end`.
pub fn generate_schedule(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Schedule {
    Schedule {
        anchor: start,
        end,
        step_months: frequency.step_months(),
        index: 0,
        exhausted: start > end,
    }
}
