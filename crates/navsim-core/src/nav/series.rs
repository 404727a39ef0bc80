use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Nav;

/// A single (date, NAV) observation for one scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavObservation {
    pub date: NaiveDate,
    pub nav: Nav,
}

impl NavObservation {
    pub fn new(date: NaiveDate, nav: Nav) -> Self {
        Self { date, nav }
    }

    /// Only observations with a strictly positive NAV may price a cash flow.
    pub fn is_usable(&self) -> bool {
        self.nav > Decimal::ZERO
    }
}

/// NAV history for one scheme.
///
/// Upstream delivers observations newest-first, but nothing here relies on
/// that: order is arbitrary and duplicate dates are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSeries {
    pub observations: Vec<NavObservation>,
}

impl NavSeries {
    pub fn new(observations: Vec<NavObservation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Latest usable observation dated on or before `target`.
    ///
    /// Scans every observation. Among equal dates the first one seen wins
    /// (a candidate only replaces the current pick when strictly later).
    /// `None` means no usable observation precedes `target`.
    pub fn resolve_on_or_before(&self, target: NaiveDate) -> Option<&NavObservation> {
        self.pick_latest(|obs| obs.date <= target)
    }

    /// Latest usable observation in the whole series, ignoring any schedule.
    pub fn latest(&self) -> Option<&NavObservation> {
        self.pick_latest(|_| true)
    }

    /// Earliest usable observation in the series.
    pub fn earliest(&self) -> Option<&NavObservation> {
        let mut best: Option<&NavObservation> = None;
        for obs in self.observations.iter().filter(|o| o.is_usable()) {
            match best {
                Some(current) if obs.date >= current.date => {}
                _ => best = Some(obs),
            }
        }
        best
    }

    fn pick_latest<F>(&self, accept: F) -> Option<&NavObservation>
    where
        F: Fn(&NavObservation) -> bool,
    {
        let mut best: Option<&NavObservation> = None;
        for obs in &self.observations {
            if !obs.is_usable() || !accept(obs) {
                continue;
            }
            match best {
                Some(current) if obs.date <= current.date => {}
                _ => best = Some(obs),
            }
        }
        best
    }
}

impl FromIterator<NavObservation> for NavSeries {
    fn from_iter<I: IntoIterator<Item = NavObservation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> NavSeries {
        NavSeries::new(vec![
            NavObservation::new(d(2023, 1, 15), dec!(12)),
            NavObservation::new(d(2023, 1, 1), dec!(10)),
        ])
    }

    #[test]
    fn test_resolves_nearest_earlier_observation() {
        let s = series();
        let obs = s.resolve_on_or_before(d(2023, 1, 10)).unwrap();
        assert_eq!(obs.date, d(2023, 1, 1));
        assert_eq!(obs.nav, dec!(10));
    }

    #[test]
    fn test_exact_date_match() {
        let s = series();
        let obs = s.resolve_on_or_before(d(2023, 1, 15)).unwrap();
        assert_eq!(obs.nav, dec!(12));
    }

    #[test]
    fn test_target_before_all_data_is_not_found() {
        assert!(series().resolve_on_or_before(d(2022, 12, 31)).is_none());
    }

    #[test]
    fn test_empty_series_is_not_found() {
        let s = NavSeries::default();
        assert!(s.resolve_on_or_before(d(2023, 1, 1)).is_none());
        assert!(s.latest().is_none());
        assert!(s.earliest().is_none());
    }

    #[test]
    fn test_non_positive_nav_is_skipped() {
        let s = NavSeries::new(vec![
            NavObservation::new(d(2023, 1, 1), dec!(10)),
            NavObservation::new(d(2023, 1, 5), dec!(0)),
            NavObservation::new(d(2023, 1, 6), dec!(-3)),
        ]);
        let obs = s.resolve_on_or_before(d(2023, 1, 10)).unwrap();
        assert_eq!(obs.date, d(2023, 1, 1));
        assert_eq!(s.latest().unwrap().date, d(2023, 1, 1));
    }

    #[test]
    fn test_all_non_positive_is_not_found() {
        let s = NavSeries::new(vec![NavObservation::new(d(2023, 1, 1), dec!(0))]);
        assert!(s.resolve_on_or_before(d(2023, 2, 1)).is_none());
    }

    #[test]
    fn test_duplicate_dates_first_seen_wins() {
        let s = NavSeries::new(vec![
            NavObservation::new(d(2023, 1, 1), dec!(10)),
            NavObservation::new(d(2023, 1, 1), dec!(11)),
        ]);
        assert_eq!(s.resolve_on_or_before(d(2023, 1, 1)).unwrap().nav, dec!(10));
        assert_eq!(s.latest().unwrap().nav, dec!(10));
    }

    #[test]
    fn test_unsorted_series() {
        let s = NavSeries::new(vec![
            NavObservation::new(d(2023, 3, 1), dec!(13)),
            NavObservation::new(d(2023, 1, 1), dec!(10)),
            NavObservation::new(d(2023, 2, 1), dec!(11)),
        ]);
        assert_eq!(s.resolve_on_or_before(d(2023, 2, 20)).unwrap().nav, dec!(11));
        assert_eq!(s.latest().unwrap().nav, dec!(13));
        assert_eq!(s.earliest().unwrap().nav, dec!(10));
    }
}
