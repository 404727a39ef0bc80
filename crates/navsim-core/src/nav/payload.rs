//! Scheme payloads as served by the public NAV API (`/mf/{scheme_code}`).
//!
//! Dates arrive as `dd-mm-yyyy` strings and NAVs as decimal strings, newest
//! first. Rows that cannot be parsed are dropped with a warning rather than
//! failing the whole scheme.

use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::series::{NavObservation, NavSeries};
use crate::error::NavSimError;
use crate::NavSimResult;

const UPSTREAM_DATE_FORMAT: &str = "%d-%m-%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Descriptive fields of a scheme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeMeta {
    #[serde(default)]
    pub fund_house: String,
    #[serde(default)]
    pub scheme_type: String,
    #[serde(default)]
    pub scheme_category: String,
    /// Upstream sends this as a number; stored as text.
    #[serde(default, deserialize_with = "code_from_any")]
    pub scheme_code: String,
    #[serde(default)]
    pub scheme_name: String,
}

/// Metadata plus NAV history for one scheme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeData {
    pub meta: SchemeMeta,
    pub series: NavSeries,
}

/// Raw upstream row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfApiNavRow {
    pub date: String,
    pub nav: Value,
}

/// Raw upstream document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfApiPayload {
    #[serde(default)]
    pub meta: SchemeMeta,
    #[serde(default)]
    pub data: Vec<MfApiNavRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SchemeData {
    pub fn new(meta: SchemeMeta, series: NavSeries) -> Self {
        Self { meta, series }
    }

    /// Parse an upstream JSON document.
    pub fn from_mfapi_json(json: &str) -> NavSimResult<Self> {
        let payload: MfApiPayload = serde_json::from_str(json)?;
        Self::try_from(payload)
    }
}

impl TryFrom<MfApiPayload> for SchemeData {
    type Error = NavSimError;

    fn try_from(payload: MfApiPayload) -> NavSimResult<Self> {
        if let Some(status) = payload.status.as_deref() {
            if !status.eq_ignore_ascii_case("SUCCESS") {
                return Err(NavSimError::InsufficientData(format!(
                    "scheme '{}' returned status {status}",
                    payload.meta.scheme_code
                )));
            }
        }

        let mut observations = Vec::with_capacity(payload.data.len());
        let mut dropped = 0usize;
        for row in &payload.data {
            match parse_row(row) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    dropped += 1;
                    warn!(
                        "scheme {}: dropping NAV row {:?}: {e}",
                        payload.meta.scheme_code, row.date
                    );
                }
            }
        }
        if dropped > 0 {
            warn!(
                "scheme {}: dropped {dropped} of {} NAV rows",
                payload.meta.scheme_code,
                payload.data.len()
            );
        }

        Ok(SchemeData {
            meta: payload.meta,
            series: NavSeries::new(observations),
        })
    }
}

/// Parse `dd-mm-yyyy`, falling back to ISO `yyyy-mm-dd`.
pub fn parse_nav_date(raw: &str) -> NavSimResult<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, UPSTREAM_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| NavSimError::DateError(format!("unrecognised date '{raw}'")))
}

fn parse_row(row: &MfApiNavRow) -> NavSimResult<NavObservation> {
    let date = parse_nav_date(&row.date)?;
    let nav = match &row.nav {
        Value::String(s) => Decimal::from_str(s.trim()),
        Value::Number(n) => Decimal::from_str(&n.to_string()),
        other => {
            return Err(NavSimError::invalid_input(
                "nav",
                format!("expected a decimal, got {other}"),
            ))
        }
    }
    .map_err(|e| NavSimError::invalid_input("nav", e.to_string()))?;
    Ok(NavObservation::new(date, nav))
}

pub(crate) fn code_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "meta": {
            "fund_house": "Axis Mutual Fund",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Equity Scheme - Large Cap Fund",
            "scheme_code": 120503,
            "scheme_name": "Axis Bluechip Fund - Direct Plan - Growth"
        },
        "data": [
            {"date": "05-01-2024", "nav": "55.12340"},
            {"date": "04-01-2024", "nav": "54.98000"},
            {"date": "not-a-date", "nav": "1.0"},
            {"date": "03-01-2024", "nav": "N.A."}
        ],
        "status": "SUCCESS"
    }"#;

    #[test]
    fn test_parses_upstream_document() {
        let scheme = SchemeData::from_mfapi_json(SAMPLE).unwrap();
        assert_eq!(scheme.meta.scheme_code, "120503");
        assert_eq!(scheme.meta.fund_house, "Axis Mutual Fund");
        assert_eq!(scheme.series.len(), 2);
        let latest = scheme.series.latest().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(latest.nav, dec!(55.1234));
    }

    #[test]
    fn test_failed_status_is_insufficient_data() {
        let json = r#"{"meta": {}, "data": [], "status": "ERROR"}"#;
        let err = SchemeData::from_mfapi_json(json).unwrap_err();
        assert!(matches!(err, NavSimError::InsufficientData(_)));
    }

    #[test]
    fn test_numeric_nav_and_iso_date() {
        let json = r#"{
            "meta": {"scheme_code": "100016"},
            "data": [{"date": "2024-02-01", "nav": 10.5}]
        }"#;
        let scheme = SchemeData::from_mfapi_json(json).unwrap();
        assert_eq!(scheme.meta.scheme_code, "100016");
        assert_eq!(scheme.series.observations[0].nav, dec!(10.5));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = SchemeData::from_mfapi_json("{not json").unwrap_err();
        assert!(matches!(err, NavSimError::SerializationError(_)));
    }
}
