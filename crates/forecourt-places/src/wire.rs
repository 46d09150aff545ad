//! JSON shapes of the places web service.
//!
//! Fields use `#[serde(default)]` for resilience against schema evolution.
//! `deny_unknown_fields` is intentionally NOT used: the provider returns far
//! more than this client reads.

use forecourt_core::{AddressPrediction, Coordinates, PlaceDetails, PlaceId, RawAddressComponent};
use serde::{Deserialize, Serialize};

/// `GET /maps/api/place/autocomplete/json` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<WirePrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePrediction {
    pub description: String,
    pub place_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_formatting: Option<StructuredFormatting>,
}

/// Two-part label of a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

impl WirePrediction {
    /// `None` when the provider sent an empty place id.
    pub fn into_prediction(self) -> Option<AddressPrediction> {
        let place_id = PlaceId::new(self.place_id).ok()?;
        let (main_text, secondary_text) = match self.structured_formatting {
            Some(sf) => (sf.main_text, sf.secondary_text),
            None => (self.description.clone(), String::new()),
        };
        Some(AddressPrediction {
            description: self.description,
            place_id,
            main_text,
            secondary_text,
        })
    }
}

/// `GET /maps/api/place/details/json` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<WirePlace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirePlace {
    #[serde(default)]
    pub address_components: Vec<WireComponent>,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl WirePlace {
    /// Convert to the core model. A place without geometry resolves at
    /// `(0, 0)`; the caller logs that case.
    pub fn into_place_details(self) -> PlaceDetails {
        let coordinates = self
            .geometry
            .map(|g| Coordinates {
                lat: g.location.lat,
                lng: g.location.lng,
            })
            .unwrap_or_default();
        PlaceDetails {
            components: self
                .address_components
                .into_iter()
                .map(|c| RawAddressComponent::new(c.long_name, c.short_name, c.types))
                .collect(),
            formatted_address: self.formatted_address,
            coordinates,
        }
    }
}
