use navsim_core::NavSimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Scheme not found: {0}")]
    SchemeNotFound(String),
    #[error("Request to {provider} timed out")]
    Timeout { provider: String },
    #[error("{provider} returned HTTP {status}")]
    Http { provider: String, status: u16 },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider: crate::provider::MFAPI_PROVIDER_ID.to_string(),
            }
        } else if let Some(status) = e.status() {
            ProviderError::Http {
                provider: crate::provider::MFAPI_PROVIDER_ID.to_string(),
                status: status.as_u16(),
            }
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::InvalidPayload(e.to_string())
    }
}

/// A non-SUCCESS status from upstream surfaces as `InsufficientData` and
/// means the scheme is unknown or unavailable.
impl From<NavSimError> for ProviderError {
    fn from(e: NavSimError) -> Self {
        match e {
            NavSimError::InsufficientData(reason) => ProviderError::SchemeNotFound(reason),
            other => ProviderError::InvalidPayload(other.to_string()),
        }
    }
}
