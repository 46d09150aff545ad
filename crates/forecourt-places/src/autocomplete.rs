//! Typed client for the place autocomplete endpoint (Prediction Provider).
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/maps/api/place/autocomplete/json` | Address predictions for free text |
//!
//! Every request is restricted to street addresses in the configured country.

use forecourt_core::{AddressPrediction, SessionToken};

use crate::config::ApiKey;
use crate::error::PlacesError;
use crate::status::ProviderStatus;
use crate::wire::AutocompleteResponse;
use crate::Lookup;

const PATH: &str = "maps/api/place/autocomplete/json";
const ENDPOINT: &str = "GET /place/autocomplete";

/// Client for the autocomplete endpoint.
#[derive(Debug, Clone)]
pub struct AutocompleteClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: ApiKey,
    country: String,
}

impl AutocompleteClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, api_key: ApiKey, country: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
            country,
        }
    }

    /// Fetch predictions for `query`.
    ///
    /// Calls `GET {base_url}/maps/api/place/autocomplete/json`. `ZERO_RESULTS`
    /// and an `OK` with no usable predictions both come back as
    /// [`Lookup::Empty`].
    pub async fn predictions(
        &self,
        query: &str,
        session: Option<SessionToken>,
    ) -> Result<Lookup<Vec<AddressPrediction>>, PlacesError> {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), PATH);
        let components = format!("country:{}", self.country);
        let mut params = vec![
            ("input", query.to_string()),
            ("types", "address".to_string()),
            ("components", components),
            ("key", self.api_key.expose().to_string()),
        ];
        if let Some(token) = session {
            params.push(("sessiontoken", token.to_string()));
        }

        let resp: AutocompleteResponse =
            crate::http::get_json(self.http.get(&url).query(&params), ENDPOINT).await?;

        let status = ProviderStatus::parse(&resp.status);
        if status.check(ENDPOINT, resp.error_message)? == Lookup::Empty {
            return Ok(Lookup::Empty);
        }

        let total = resp.predictions.len();
        let predictions: Vec<AddressPrediction> = resp
            .predictions
            .into_iter()
            .filter_map(|p| p.into_prediction())
            .collect();
        if predictions.len() < total {
            tracing::warn!(
                endpoint = ENDPOINT,
                dropped = total - predictions.len(),
                "dropped predictions without a place id"
            );
        }

        if predictions.is_empty() {
            Ok(Lookup::Empty)
        } else {
            Ok(Lookup::Found(predictions))
        }
    }
}
