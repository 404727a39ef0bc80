use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use navsim_core::analytics::trailing::{self, TrailingInput, TrailingPeriod};
use navsim_core::calculators::lumpsum::{self, LumpsumInput};
use navsim_core::calculators::returns::{self, PeriodReturnInput};

use super::with_scheme;
use crate::input;
use crate::source::{self, ProviderArgs, SeriesArgs};

/// Arguments for a point-to-point return
#[derive(Args)]
pub struct ReturnsArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a one-time investment
#[derive(Args)]
pub struct LumpsumArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Amount invested on the start date
    #[arg(long)]
    pub amount: Option<Decimal>,

    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for trailing returns
#[derive(Args)]
pub struct TrailingArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Valuation date; defaults to the latest NAV date
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Comma-separated windows: 1m,3m,6m,1y,3y,5y
    #[arg(long, value_delimiter = ',')]
    pub periods: Option<Vec<TrailingPeriod>>,
}

pub fn run_returns(
    args: ReturnsArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let returns_input: PeriodReturnInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        PeriodReturnInput {
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
            end_date: args
                .end_date
                .ok_or("--end-date is required (or provide --input)")?,
        }
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = returns::compute_returns(&scheme.series, &returns_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}

pub fn run_lumpsum(
    args: LumpsumArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let lumpsum_input: LumpsumInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        LumpsumInput {
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
            end_date: args
                .end_date
                .ok_or("--end-date is required (or provide --input)")?,
        }
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = lumpsum::simulate_lumpsum(&scheme.series, &lumpsum_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}

pub fn run_trailing(
    args: TrailingArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let trailing_input = TrailingInput {
        as_of: args.as_of,
        periods: args.periods,
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = trailing::trailing_returns(&scheme.series, &trailing_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}
