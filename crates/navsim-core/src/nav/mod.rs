//! NAV observations, series, upstream scheme payloads and the scheme list.

pub mod catalog;
pub mod payload;
pub mod series;

pub use catalog::{search_schemes, SchemeSummary};
pub use payload::{parse_nav_date, MfApiNavRow, MfApiPayload, SchemeData, SchemeMeta};
pub use series::{NavObservation, NavSeries};
