//! Places client error types.
//!
//! An empty result set is not an error; it is [`crate::Lookup::Empty`].

/// Errors from places provider calls.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// Network failure, timeout, or unreachable host.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The provider answered with a non-2xx HTTP status.
    #[error("places provider {endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body could not be decoded.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// `OVER_QUERY_LIMIT`.
    #[error("places quota exceeded on {endpoint}: {message}")]
    QuotaExceeded { endpoint: String, message: String },
    /// `REQUEST_DENIED`, usually a bad or restricted API key.
    #[error("places request denied on {endpoint}: {message}")]
    PermissionDenied { endpoint: String, message: String },
    /// `INVALID_REQUEST`.
    #[error("invalid places request on {endpoint}: {message}")]
    InvalidRequest { endpoint: String, message: String },
    /// Any other non-success status, including `UNKNOWN_ERROR`.
    #[error("places provider {endpoint} returned status {status}: {message}")]
    UnknownStatus {
        endpoint: String,
        status: String,
        message: String,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl PlacesError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::HttpStatus { .. } => "http_status",
            Self::Deserialization { .. } => "deserialization",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UnknownStatus { .. } => "unknown_status",
            Self::Config(_) => "config",
        }
    }

    /// Failures that may clear up by themselves if the user keeps typing.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::QuotaExceeded { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
