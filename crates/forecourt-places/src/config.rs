//! Places client configuration.
//!
//! Defaults point at the production places web service restricted to the
//! United Kingdom. Override via environment variables or explicit
//! construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default ISO 3166-1 alpha-2 country restriction.
pub const DEFAULT_COUNTRY: &str = "gb";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider API key. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// The raw key, for the outbound query string only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Configuration for connecting to the places provider.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL of the places web service.
    /// Default: <https://maps.googleapis.com>
    pub base_url: Url,
    /// API key sent as the `key` query parameter.
    pub api_key: ApiKey,
    /// Lowercase alpha-2 country every search is restricted to.
    pub country: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PlacesConfig {
    /// Configuration with default base URL, country and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", DEFAULT_BASE_URL)?,
            api_key: ApiKey::new(api_key),
            country: DEFAULT_COUNTRY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PLACES_API_KEY` (required)
    /// - `PLACES_BASE_URL` (default: `https://maps.googleapis.com`)
    /// - `PLACES_COUNTRY` (default: `gb`)
    /// - `PLACES_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("PLACES_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let raw_url = std::env::var("PLACES_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let country = std::env::var("PLACES_COUNTRY").unwrap_or_else(|_| DEFAULT_COUNTRY.into());

        Ok(Self {
            base_url: parse_url("PLACES_BASE_URL", &raw_url)?,
            api_key: ApiKey::new(api_key),
            country: check_country(&country)?,
            timeout_secs: std::env::var("PLACES_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replace the base URL, e.g. with a mock server address.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_url("base_url", raw)?;
        Ok(self)
    }

    /// Replace the country restriction.
    pub fn with_country(mut self, country: &str) -> Result<Self, ConfigError> {
        self.country = check_country(country)?;
        Ok(self)
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn check_country(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim().to_ascii_lowercase();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(code)
    } else {
        Err(ConfigError::InvalidCountry(raw.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PLACES_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("country restriction must be a two-letter ISO code, got {0:?}")]
    InvalidCountry(String),
}
