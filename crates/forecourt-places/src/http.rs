//! Shared request path for both places endpoints.
//!
//! No retries: a failed call ends the current search or resolve attempt, and
//! the next keystroke issues a fresh request anyway.

use serde::de::DeserializeOwned;

use crate::error::PlacesError;

/// Send a GET and decode the JSON body.
///
/// The request URL carries the API key, so it is never logged; only the
/// `endpoint` label is.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: &str,
) -> Result<T, PlacesError> {
    let resp = request.send().await.map_err(|e| {
        tracing::debug!(endpoint, timeout = e.is_timeout(), "places request failed to send");
        PlacesError::Transport {
            endpoint: endpoint.into(),
            source: e.without_url(),
        }
    })?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(PlacesError::HttpStatus {
            endpoint: endpoint.into(),
            status,
            body,
        });
    }

    resp.json().await.map_err(|e| PlacesError::Deserialization {
        endpoint: endpoint.into(),
        source: e.without_url(),
    })
}
