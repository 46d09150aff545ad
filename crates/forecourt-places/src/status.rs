//! Provider status codes and how they map onto [`Lookup`] / [`PlacesError`].

use crate::error::PlacesError;
use crate::Lookup;

/// `status` field of every places response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Ok,
    ZeroResults,
    /// Details only: the place id is no longer known to the provider.
    NotFound,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    /// Anything else, including `UNKNOWN_ERROR`.
    Other(String),
}

impl ProviderStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => Self::Ok,
            "ZERO_RESULTS" => Self::ZeroResults,
            "NOT_FOUND" => Self::NotFound,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            "INVALID_REQUEST" => Self::InvalidRequest,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::NotFound => "NOT_FOUND",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Other(s) => s,
        }
    }

    /// `Found(())` when a payload should be read, `Empty` for a legitimate
    /// empty outcome, otherwise the matching failure.
    pub fn check(self, endpoint: &str, message: Option<String>) -> Result<Lookup<()>, PlacesError> {
        let endpoint = endpoint.to_string();
        let message = message.unwrap_or_default();
        match self {
            Self::Ok => Ok(Lookup::Found(())),
            Self::ZeroResults | Self::NotFound => Ok(Lookup::Empty),
            Self::OverQueryLimit => Err(PlacesError::QuotaExceeded { endpoint, message }),
            Self::RequestDenied => Err(PlacesError::PermissionDenied { endpoint, message }),
            Self::InvalidRequest => Err(PlacesError::InvalidRequest { endpoint, message }),
            Self::Other(status) => Err(PlacesError::UnknownStatus {
                endpoint,
                status,
                message,
            }),
        }
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
