pub mod cache;
pub mod error;
pub mod provider;

use futures::future::join_all;
use log::warn;
use navsim_core::SchemeData;

pub use cache::{CachedNavProvider, NavCache, TtlCache, DEFAULT_TTL, SCHEME_LIST_TTL};
pub use error::ProviderError;
pub use provider::{MfApiClient, NavProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Fetch several schemes concurrently, keeping request order and dropping
/// the ones that fail.
pub async fn fetch_many<P>(provider: &P, scheme_codes: &[String]) -> Vec<SchemeData>
where
    P: NavProvider + ?Sized,
{
    let results = join_all(scheme_codes.iter().map(|code| provider.fetch_scheme(code))).await;

    scheme_codes
        .iter()
        .zip(results)
        .filter_map(|(code, result)| match result {
            Ok(scheme) => Some(scheme),
            Err(e) => {
                warn!("{}: skipping scheme {code}: {e}", provider.id());
                None
            }
        })
        .collect()
}
