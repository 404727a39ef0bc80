use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::NavSimError;
use crate::types::{Money, Percent};
use crate::NavSimResult;

/// Yearly escalation of an SIP installment or SWP withdrawal.
///
/// The amount grows by `step_up_pct` once for every calendar-year boundary the
/// schedule crosses, applied before the first cash flow of the new year. A
/// jump of more than one calendar year between cash flows still escalates
/// once, not once per year skipped.
#[derive(Debug, Clone)]
pub struct StepUp {
    current_amount: Money,
    current_year: i32,
    factor: Decimal,
}

impl StepUp {
    pub fn new(
        base_amount: Money,
        start_date: NaiveDate,
        step_up_pct: Percent,
    ) -> NavSimResult<Self> {
        validate_step_up_pct(step_up_pct)?;
        Ok(Self {
            current_amount: base_amount,
            current_year: start_date.year(),
            factor: Decimal::ONE + step_up_pct / dec!(100),
        })
    }

    /// Amount due on `date`, escalating first if a new year has begun.
    pub fn amount_for(&mut self, date: NaiveDate) -> Money {
        if date.year() > self.current_year {
            self.current_amount *= self.factor;
            self.current_year = date.year();
        }
        self.current_amount
    }

    pub fn current_amount(&self) -> Money {
        self.current_amount
    }
}

pub(crate) fn validate_step_up_pct(step_up_pct: Percent) -> NavSimResult<()> {
    if step_up_pct <= dec!(-100) {
        return Err(NavSimError::invalid_input(
            "step_up_pct",
            "Step-up percentage must be greater than -100",
        ));
    }
    Ok(())
}
