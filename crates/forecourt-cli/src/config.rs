//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! places:
//!   base_url: https://maps.googleapis.com
//!   country: gb
//!   timeout_secs: 5
//! search:
//!   debounce_ms: 300
//!   min_query_len: 3
//! ```
//!
//! Every key is optional. The API key is only ever read from
//! `PLACES_API_KEY`, never from the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use forecourt_address::SearchSettings;
use forecourt_places::PlacesConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub places: PlacesOverrides,
    pub search: SearchSettings,
}

/// Overrides applied on top of the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesOverrides {
    pub base_url: Option<String>,
    pub country: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CliConfig {
    /// Read the file at `path`, or defaults when no path was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded CLI config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Provider configuration from the environment with file overrides.
    pub fn places_config(&self) -> Result<PlacesConfig> {
        let base = PlacesConfig::from_env().context("places provider is not configured")?;
        self.places.apply(base)
    }
}

impl PlacesOverrides {
    pub fn apply(&self, mut config: PlacesConfig) -> Result<PlacesConfig> {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(country) = &self.country {
            config = config.with_country(country)?;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        Ok(config)
    }
}
