mod commands;
mod input;
mod output;
mod source;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::analytics::{PeersArgs, PortfolioArgs};
use commands::plans::{SipArgs, SwpArgs};
use commands::returns::{LumpsumArgs, ReturnsArgs, TrailingArgs};
use commands::search::SearchArgs;
use source::ProviderArgs;

/// Mutual-fund investment simulations over historical NAVs
#[derive(Parser)]
#[command(
    name = "navsim",
    version,
    about = "Mutual-fund investment simulations over historical NAVs",
    long_about = "Simulate SIP, SWP, step-up and lumpsum investments against a scheme's \
                  NAV history with decimal precision. NAVs come from a saved NAV API \
                  document, a live fetch by scheme code, or JSON piped on stdin. \
                  `navsim search` finds scheme codes by name."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    provider: ProviderArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Point-to-point simple and annualised return
    Returns(ReturnsArgs),
    /// Systematic investment plan
    Sip(SipArgs),
    /// SIP whose installment rises every calendar year
    StepUpSip(SipArgs),
    /// Systematic withdrawal plan
    Swp(SwpArgs),
    /// SWP whose withdrawal rises every calendar year
    StepUpSwp(SwpArgs),
    /// One-time investment
    Lumpsum(LumpsumArgs),
    /// Returns over 1m, 3m, 6m, 1y, 3y and 5y windows
    Trailing(TrailingArgs),
    /// Rank schemes by 1-year return
    Peers(PeersArgs),
    /// Value holdings at the latest NAV
    Portfolio(PortfolioArgs),
    /// Find schemes by name or code
    Search(SearchArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = &cli.provider;
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Returns(args) => commands::returns::run_returns(args, cfg),
        Commands::Sip(args) => commands::plans::run_sip(args, cfg),
        Commands::StepUpSip(args) => commands::plans::run_step_up_sip(args, cfg),
        Commands::Swp(args) => commands::plans::run_swp(args, cfg),
        Commands::StepUpSwp(args) => commands::plans::run_step_up_swp(args, cfg),
        Commands::Lumpsum(args) => commands::returns::run_lumpsum(args, cfg),
        Commands::Trailing(args) => commands::returns::run_trailing(args, cfg),
        Commands::Peers(args) => commands::analytics::run_peers(args, cfg),
        Commands::Portfolio(args) => commands::analytics::run_portfolio(args, cfg),
        Commands::Search(args) => commands::search::run_search(args, cfg),
        Commands::Version => {
            println!("navsim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
