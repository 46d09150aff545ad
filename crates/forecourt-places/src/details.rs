//! Typed client for the place details endpoint (Place Detail Client).
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/maps/api/place/details/json` | Components, formatted address and geometry for a place id |
//!
//! Only the three field groups decomposition needs are requested, which also
//! keeps the call in the cheapest billing tier.

use forecourt_core::{PlaceDetails, PlaceId, SessionToken};

use crate::config::ApiKey;
use crate::error::PlacesError;
use crate::status::ProviderStatus;
use crate::wire::DetailsResponse;
use crate::Lookup;

const PATH: &str = "maps/api/place/details/json";
const ENDPOINT: &str = "GET /place/details";
const FIELDS: &str = "address_component,formatted_address,geometry";

/// Client for the place details endpoint.
#[derive(Debug, Clone)]
pub struct DetailsClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: ApiKey,
}

impl DetailsClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, api_key: ApiKey) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Resolve one place.
    ///
    /// Calls `GET {base_url}/maps/api/place/details/json`. `ZERO_RESULTS`,
    /// `NOT_FOUND` and an `OK` without a `result` object come back as
    /// [`Lookup::Empty`].
    pub async fn get(
        &self,
        place_id: &PlaceId,
        session: Option<SessionToken>,
    ) -> Result<Lookup<PlaceDetails>, PlacesError> {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), PATH);
        let mut params = vec![
            ("place_id", place_id.as_str().to_string()),
            ("fields", FIELDS.to_string()),
            ("key", self.api_key.expose().to_string()),
        ];
        if let Some(token) = session {
            params.push(("sessiontoken", token.to_string()));
        }

        let resp: DetailsResponse =
            crate::http::get_json(self.http.get(&url).query(&params), ENDPOINT).await?;

        let status = ProviderStatus::parse(&resp.status);
        if status.check(ENDPOINT, resp.error_message)? == Lookup::Empty {
            return Ok(Lookup::Empty);
        }

        let Some(place) = resp.result else {
            tracing::warn!(endpoint = ENDPOINT, %place_id, "OK status without a result body");
            return Ok(Lookup::Empty);
        };
        if place.geometry.is_none() {
            tracing::warn!(endpoint = ENDPOINT, %place_id, "place has no geometry; using (0, 0)");
        }
        Ok(Lookup::Found(place.into_place_details()))
    }
}
