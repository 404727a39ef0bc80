use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use navsim_core::analytics::peers::{self, PeerComparisonInput, PeerFilter};
use navsim_core::analytics::portfolio::{self, PortfolioInput};

use crate::input;
use crate::source::{self, ProviderArgs};

/// Arguments for a peer ranking
#[derive(Args)]
pub struct PeersArgs {
    /// Comma-separated scheme codes to fetch
    #[arg(long, value_delimiter = ',')]
    pub schemes: Vec<String>,

    /// NAV API JSON documents to include (repeatable)
    #[arg(long = "nav-file")]
    pub nav_files: Vec<String>,

    /// all, high-returns, 3-years, 10-years or top-performers
    #[arg(long, default_value = "all")]
    pub filter: PeerFilter,

    /// Maximum rows returned
    #[arg(long)]
    pub limit: Option<usize>,

    /// Valuation date; defaults to each scheme's latest NAV date
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for portfolio valuation
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON file with `holdings`
    #[arg(long)]
    pub input: Option<String>,

    /// NAV API JSON documents to value against (repeatable); missing codes are fetched
    #[arg(long = "nav-file")]
    pub nav_files: Vec<String>,
}

pub fn run_peers(args: PeersArgs, cfg: &ProviderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.schemes.is_empty() && args.nav_files.is_empty() {
        return Err("--schemes or --nav-file is required for peer comparison".into());
    }

    let schemes = source::load_schemes(&args.nav_files, &args.schemes, cfg)?;
    let peer_input = PeerComparisonInput {
        as_of: args.as_of,
        filter: args.filter,
        limit: args.limit,
    };

    let result = peers::compare_peers(&schemes, &peer_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_portfolio(
    args: PortfolioArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio_input: PortfolioInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(holdings) = input::stdin::read_stdin()? {
        holdings
    } else {
        return Err(
            "--input file (or holdings JSON on stdin) is required for portfolio valuation".into(),
        );
    };

    let mut navs = source::series_by_code(source::load_schemes(&args.nav_files, &[], cfg)?);
    let mut missing: Vec<String> = portfolio_input
        .holdings
        .iter()
        .map(|h| h.scheme_code.clone())
        .filter(|code| !navs.contains_key(code))
        .collect();
    missing.sort();
    missing.dedup();
    navs.extend(source::series_by_code(source::load_schemes(&[], &missing, cfg)?));

    let result = portfolio::value_portfolio(&portfolio_input, &navs)?;
    Ok(serde_json::to_value(result)?)
}
