pub mod analytics;
pub mod calculators;
pub mod error;
pub mod nav;
pub mod schedule;
pub mod types;

pub use error::NavSimError;
pub use nav::{NavObservation, NavSeries, SchemeData, SchemeMeta, SchemeSummary};
pub use schedule::{generate_schedule, Frequency};
pub use types::*;

/// Standard result type for all navsim operations
pub type NavSimResult<T> = Result<T, NavSimError>;
