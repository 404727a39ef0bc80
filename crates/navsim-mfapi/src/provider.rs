use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use navsim_core::nav::{MfApiPayload, SchemeData, SchemeSummary};
use reqwest::{Client, StatusCode};

use crate::error::ProviderError;

pub const MFAPI_PROVIDER_ID: &str = "mfapi";
pub const DEFAULT_BASE_URL: &str = "https://api.mfapi.in";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Source of scheme metadata and NAV history.
#[async_trait]
pub trait NavProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn fetch_scheme(&self, scheme_code: &str) -> Result<SchemeData, ProviderError>;

    /// Every scheme the source knows, as code and name.
    async fn fetch_scheme_list(&self) -> Result<Vec<SchemeSummary>, ProviderError>;
}

/// HTTP client for `GET {base_url}/mf` and `GET {base_url}/mf/{scheme_code}`.
pub struct MfApiClient {
    client: Client,
    base_url: String,
}

impl MfApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scheme_url(&self, scheme_code: &str) -> String {
        format!("{}/mf/{}", self.base_url, scheme_code.trim())
    }

    fn scheme_list_url(&self) -> String {
        format!("{}/mf", self.base_url)
    }
}

#[async_trait]
impl NavProvider for MfApiClient {
    fn id(&self) -> &str {
        MFAPI_PROVIDER_ID
    }

    async fn fetch_scheme(&self, scheme_code: &str) -> Result<SchemeData, ProviderError> {
        let url = self.scheme_url(scheme_code);
        info!("Fetching NAV history for scheme {scheme_code}");
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::SchemeNotFound(scheme_code.to_string()));
        }
        let body = response.error_for_status()?.text().await?;

        let payload: MfApiPayload = serde_json::from_str(&body)?;
        // Unknown codes come back as 200 with an empty document.
        if payload.data.is_empty() {
            return Err(ProviderError::SchemeNotFound(scheme_code.to_string()));
        }
        let mut scheme = SchemeData::try_from(payload)?;
        if scheme.meta.scheme_code.is_empty() {
            scheme.meta.scheme_code = scheme_code.to_string();
        }
        Ok(scheme)
    }

    async fn fetch_scheme_list(&self) -> Result<Vec<SchemeSummary>, ProviderError> {
        let url = self.scheme_list_url();
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let body = response.error_for_status()?.text().await?;
        let schemes: Vec<SchemeSummary> = serde_json::from_str(&body)?;
        info!("Scheme list holds {} schemes", schemes.len());
        Ok(schemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_url_strips_trailing_slash() {
        let client = MfApiClient::new("https://api.mfapi.in/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.scheme_url(" 120503 "), "https://api.mfapi.in/mf/120503");
        assert_eq!(client.scheme_list_url(), "https://api.mfapi.in/mf");
    }
}
