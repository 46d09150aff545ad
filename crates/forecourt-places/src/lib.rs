//! # forecourt-places -- Typed Rust client for the places provider
//!
//! Provides typed access to the two provider endpoints the address pipeline
//! consumes:
//! - **Autocomplete** via `/maps/api/place/autocomplete/json`
//! - **Place details** via `/maps/api/place/details/json`
//!
//! ## Architecture
//!
//! This crate is the only path from Forecourt to the places provider. The
//! search controller in `forecourt-address` talks to it through the
//! [`PlacesProvider`] trait so tests and alternative providers can stand in
//! for the HTTP client.
//!
//! ## Outcomes
//!
//! Every call yields `Ok(Lookup::Found(payload))`, `Ok(Lookup::Empty)`, or
//! `Err(PlacesError)`. The error distinguishes quota, permission, invalid
//! request and unknown statuses for logging; callers decide how loudly to
//! surface them. Nothing is retried.

pub mod autocomplete;
pub mod config;
pub mod details;
pub mod error;
pub(crate) mod http;
pub mod status;
pub mod wire;

pub use config::{ApiKey, ConfigError, PlacesConfig};
pub use error::PlacesError;
pub use status::ProviderStatus;

use std::time::Duration;

use async_trait::async_trait;
use forecourt_core::{AddressPrediction, PlaceDetails, PlaceId, SessionToken};

/// Result of a call that reached the provider successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The provider returned a payload.
    Found(T),
    /// The provider legitimately had nothing for this request.
    Empty,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Empty => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(v) => Lookup::Found(f(v)),
            Self::Empty => Lookup::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// The two provider calls the address pipeline depends on.
///
/// Implementations must be `Send + Sync` so a widget task can hold them
/// behind an `Arc`.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Autocomplete predictions for free text.
    async fn predictions(
        &self,
        query: &str,
        session: Option<SessionToken>,
    ) -> Result<Lookup<Vec<AddressPrediction>>, PlacesError>;

    /// Full address data for one prediction.
    async fn place_details(
        &self,
        place_id: &PlaceId,
        session: Option<SessionToken>,
    ) -> Result<Lookup<PlaceDetails>, PlacesError>;
}

/// Top-level places client. Holds a sub-client per endpoint sharing one
/// connection pool.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    autocomplete: autocomplete::AutocompleteClient,
    details: details::DetailsClient,
}

impl PlacesClient {
    /// Create a new places client from configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlacesError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            autocomplete: autocomplete::AutocompleteClient::new(
                http.clone(),
                config.base_url.clone(),
                config.api_key.clone(),
                config.country,
            ),
            details: details::DetailsClient::new(http, config.base_url, config.api_key),
        })
    }

    /// Access the autocomplete client.
    pub fn autocomplete(&self) -> &autocomplete::AutocompleteClient {
        &self.autocomplete
    }

    /// Access the place details client.
    pub fn details(&self) -> &details::DetailsClient {
        &self.details
    }
}

#[async_trait]
impl PlacesProvider for PlacesClient {
    async fn predictions(
        &self,
        query: &str,
        session: Option<SessionToken>,
    ) -> Result<Lookup<Vec<AddressPrediction>>, PlacesError> {
        self.autocomplete.predictions(query, session).await
    }

    async fn place_details(
        &self,
        place_id: &PlaceId,
        session: Option<SessionToken>,
    ) -> Result<Lookup<PlaceDetails>, PlacesError> {
        self.details.get(place_id, session).await
    }
}
