use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use navsim_core::calculators::sip::{self, SipInput, StepUpSipInput};
use navsim_core::calculators::swp::{self, StepUpSwpInput, SwpInput};
use navsim_core::Frequency;

use super::with_scheme;
use crate::input;
use crate::source::{self, ProviderArgs, SeriesArgs};

/// Schedule flags shared by every plan
#[derive(Args)]
pub struct ScheduleArgs {
    /// monthly, quarterly or yearly
    #[arg(long, default_value = "monthly")]
    pub frequency: Frequency,

    /// First schedule date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last date a cash flow may fall on (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

/// Arguments for an SIP, optionally stepped up
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SipArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Installment amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Yearly escalation in percent (step-up only)
    #[arg(long)]
    pub step_up_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an SWP, optionally stepped up
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SwpArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Lump sum converted to units on the start date
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Cash withdrawn per installment
    #[arg(long)]
    pub withdrawal_amount: Option<Decimal>,

    /// Yearly escalation in percent (step-up only)
    #[arg(long)]
    pub step_up_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn sip_from_flags(args: &SipArgs) -> Result<SipInput, Box<dyn std::error::Error>> {
    Ok(SipInput {
        amount: args.amount.ok_or("--amount is required (or provide --input)")?,
        frequency: args.schedule.frequency,
        start_date: args
            .schedule
            .start_date
            .ok_or("--start-date is required (or provide --input)")?,
        end_date: args
            .schedule
            .end_date
            .ok_or("--end-date is required (or provide --input)")?,
    })
}

fn swp_from_flags(args: &SwpArgs) -> Result<SwpInput, Box<dyn std::error::Error>> {
    Ok(SwpInput {
        initial_investment: args
            .initial_investment
            .ok_or("--initial-investment is required (or provide --input)")?,
        withdrawal_amount: args
            .withdrawal_amount
            .ok_or("--withdrawal-amount is required (or provide --input)")?,
        frequency: args.schedule.frequency,
        start_date: args
            .schedule
            .start_date
            .ok_or("--start-date is required (or provide --input)")?,
        end_date: args
            .schedule
            .end_date
            .ok_or("--end-date is required (or provide --input)")?,
    })
}

pub fn run_sip(args: SipArgs, cfg: &ProviderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = match args.input {
        Some(ref path) => input::file::read_json(path)?,
        None => sip_from_flags(&args)?,
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = sip::simulate_sip(&scheme.series, &sip_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}

pub fn run_step_up_sip(
    args: SipArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let step_up_input: StepUpSipInput = match args.input {
        Some(ref path) => input::file::read_json(path)?,
        None => StepUpSipInput {
            sip: sip_from_flags(&args)?,
            step_up_pct: args
                .step_up_pct
                .ok_or("--step-up-pct is required (or provide --input)")?,
        },
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = sip::simulate_step_up_sip(&scheme.series, &step_up_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}

pub fn run_swp(args: SwpArgs, cfg: &ProviderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let swp_input: SwpInput = match args.input {
        Some(ref path) => input::file::read_json(path)?,
        None => swp_from_flags(&args)?,
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = swp::simulate_swp(&scheme.series, &swp_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}

pub fn run_step_up_swp(
    args: SwpArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let step_up_input: StepUpSwpInput = match args.input {
        Some(ref path) => input::file::read_json(path)?,
        None => StepUpSwpInput {
            swp: swp_from_flags(&args)?,
            step_up_pct: args
                .step_up_pct
                .ok_or("--step-up-pct is required (or provide --input)")?,
        },
    };

    let scheme = source::load_scheme(&args.series, cfg)?;
    let result = swp::simulate_step_up_swp(&scheme.series, &step_up_input)?;
    with_scheme(serde_json::to_value(result)?, &scheme.meta)
}
