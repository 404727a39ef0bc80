use std::collections::HashMap;

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use navsim_core::analytics::{peers, portfolio, trailing};
use navsim_core::calculators::{lumpsum, returns, sip, swp};
use navsim_core::nav::{self, MfApiPayload, SchemeData, SchemeSummary};
use navsim_core::NavSeries;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// `{ "scheme": <NAV API document>, ...calculator fields }`
#[derive(Deserialize)]
struct SchemeRequest<T> {
    scheme: MfApiPayload,
    #[serde(flatten)]
    params: T,
}

fn parse_request<T: DeserializeOwned>(input_json: &str) -> NapiResult<(NavSeries, T)> {
    let request: SchemeRequest<T> = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let scheme = SchemeData::try_from(request.scheme).map_err(to_napi_error)?;
    Ok((scheme.series, request.params))
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_returns(input_json: String) -> NapiResult<String> {
    let (series, input): (_, returns::PeriodReturnInput) = parse_request(&input_json)?;
    let output = returns::compute_returns(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn trailing_returns(input_json: String) -> NapiResult<String> {
    let (series, input): (_, trailing::TrailingInput) = parse_request(&input_json)?;
    let output = trailing::trailing_returns(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_sip(input_json: String) -> NapiResult<String> {
    let (series, input): (_, sip::SipInput) = parse_request(&input_json)?;
    let output = sip::simulate_sip(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_step_up_sip(input_json: String) -> NapiResult<String> {
    let (series, input): (_, sip::StepUpSipInput) = parse_request(&input_json)?;
    let output = sip::simulate_step_up_sip(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_swp(input_json: String) -> NapiResult<String> {
    let (series, input): (_, swp::SwpInput) = parse_request(&input_json)?;
    let output = swp::simulate_swp(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_step_up_swp(input_json: String) -> NapiResult<String> {
    let (series, input): (_, swp::StepUpSwpInput) = parse_request(&input_json)?;
    let output = swp::simulate_step_up_swp(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_lumpsum(input_json: String) -> NapiResult<String> {
    let (series, input): (_, lumpsum::LumpsumInput) = parse_request(&input_json)?;
    let output = lumpsum::simulate_lumpsum(&series, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Multi-scheme analytics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct MultiSchemeRequest<T> {
    schemes: Vec<MfApiPayload>,
    #[serde(flatten)]
    params: T,
}

fn parse_schemes<T: DeserializeOwned>(input_json: &str) -> NapiResult<(Vec<SchemeData>, T)> {
    let request: MultiSchemeRequest<T> =
        serde_json::from_str(input_json).map_err(to_napi_error)?;
    let schemes = request
        .schemes
        .into_iter()
        .map(SchemeData::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_napi_error)?;
    Ok((schemes, request.params))
}

#[napi]
pub fn compare_peers(input_json: String) -> NapiResult<String> {
    let (schemes, input): (_, peers::PeerComparisonInput) = parse_schemes(&input_json)?;
    let output = peers::compare_peers(&schemes, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn value_portfolio(input_json: String) -> NapiResult<String> {
    let (schemes, input): (_, portfolio::PortfolioInput) = parse_schemes(&input_json)?;
    let navs: HashMap<String, NavSeries> = schemes
        .into_iter()
        .map(|s| (s.meta.scheme_code, s.series))
        .collect();
    let output = portfolio::value_portfolio(&input, &navs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scheme list
// ---------------------------------------------------------------------------

/// `{ "list": <scheme list document>, "query": "..." }`
#[derive(Deserialize)]
struct SearchRequest {
    list: Vec<SchemeSummary>,
    #[serde(default)]
    query: String,
}

#[napi]
pub fn search_schemes(input_json: String) -> NapiResult<String> {
    let request: SearchRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let matches = nav::search_schemes(&request.list, &request.query);
    serde_json::to_string(&matches).map_err(to_napi_error)
}
