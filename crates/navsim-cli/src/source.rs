use std::collections::HashMap;
use std::time::Duration;

use clap::Args;
use log::info;
use navsim_core::nav::{MfApiPayload, NavSeries, SchemeData, SchemeSummary};
use navsim_mfapi::{
    fetch_many, CachedNavProvider, MfApiClient, NavProvider, TtlCache, DEFAULT_BASE_URL,
};

use crate::input;

/// Upstream NAV API settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Base URL of the NAV API
    #[arg(long, global = true, env = "NAVSIM_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "NAVSIM_TIMEOUT_SECS", default_value = "8")]
    pub timeout_secs: u64,

    /// How long a fetched scheme stays cached, in seconds
    #[arg(long, global = true, env = "NAVSIM_CACHE_TTL_SECS", default_value = "43200")]
    pub cache_ttl_secs: u64,
}

/// Where a single scheme's NAV history comes from
#[derive(Args, Debug, Clone)]
pub struct SeriesArgs {
    /// Path to a NAV API JSON document for the scheme
    #[arg(long, conflicts_with = "scheme")]
    pub nav_file: Option<String>,

    /// Scheme code to fetch from the NAV API
    #[arg(long)]
    pub scheme: Option<String>,
}

type Provider = CachedNavProvider<MfApiClient, TtlCache>;

fn provider(cfg: &ProviderArgs) -> Result<Provider, Box<dyn std::error::Error>> {
    let client = MfApiClient::new(&cfg.api_base_url, Duration::from_secs(cfg.timeout_secs))?;
    Ok(CachedNavProvider::new(
        client,
        TtlCache::new(),
        Duration::from_secs(cfg.cache_ttl_secs),
    ))
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Resolve the scheme from `--nav-file`, `--scheme`, or piped stdin.
pub fn load_scheme(
    args: &SeriesArgs,
    cfg: &ProviderArgs,
) -> Result<SchemeData, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.nav_file {
        return read_scheme_file(path);
    }
    if let Some(ref code) = args.scheme {
        let provider = provider(cfg)?;
        let scheme = block_on(provider.fetch_scheme(code))??;
        info!(
            "Loaded {} NAV observations for {}",
            scheme.series.len(),
            scheme.meta.scheme_name
        );
        return Ok(scheme);
    }
    if let Some(payload) = input::stdin::read_stdin::<MfApiPayload>()? {
        return Ok(SchemeData::try_from(payload)?);
    }
    Err("a NAV source is required: --nav-file, --scheme, or a JSON document on stdin".into())
}

pub fn read_scheme_file(path: &str) -> Result<SchemeData, Box<dyn std::error::Error>> {
    let contents = input::file::read_to_string(path)?;
    Ok(SchemeData::from_mfapi_json(&contents)
        .map_err(|e| format!("Failed to load NAV file '{path}': {e}"))?)
}

/// Load several schemes: files first, then concurrent fetches for codes.
pub fn load_schemes(
    nav_files: &[String],
    codes: &[String],
    cfg: &ProviderArgs,
) -> Result<Vec<SchemeData>, Box<dyn std::error::Error>> {
    let mut schemes = nav_files
        .iter()
        .map(|p| read_scheme_file(p))
        .collect::<Result<Vec<_>, _>>()?;

    if !codes.is_empty() {
        let provider = provider(cfg)?;
        let fetched = block_on(fetch_many(&provider, codes))?;
        info!("Fetched {} of {} schemes", fetched.len(), codes.len());
        schemes.extend(fetched);
    }
    Ok(schemes)
}

/// The scheme list from a saved `/mf` document, or fetched upstream.
pub fn load_scheme_list(
    list_file: Option<&str>,
    cfg: &ProviderArgs,
) -> Result<Vec<SchemeSummary>, Box<dyn std::error::Error>> {
    if let Some(path) = list_file {
        return input::file::read_json(path);
    }
    let provider = provider(cfg)?;
    let schemes = block_on(provider.fetch_scheme_list())??;
    info!("Scheme list holds {} schemes", schemes.len());
    Ok(schemes)
}

/// NAV series keyed by scheme code.
pub fn series_by_code(schemes: Vec<SchemeData>) -> HashMap<String, NavSeries> {
    schemes
        .into_iter()
        .map(|s| (s.meta.scheme_code, s.series))
        .collect()
}
