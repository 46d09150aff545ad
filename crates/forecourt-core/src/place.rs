//! # Place Model
//!
//! Shapes that move through the resolution pipeline:
//!
//! ```text
//! AddressPrediction ──select──► PlaceDetails ──decompose──► ParsedAddress
//! ```
//!
//! Predictions and details are ephemeral. A `ParsedAddress` belongs to the
//! caller as soon as it is emitted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::PlaceId;

/// One autocomplete suggestion, not yet resolved to address data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPrediction {
    /// Full one-line label, e.g. `10 Downing Street, London, UK`.
    pub description: String,
    pub place_id: PlaceId,
    /// Primary half of the two-part label.
    pub main_text: String,
    /// Secondary half of the two-part label.
    pub secondary_text: String,
}

/// A raw component of a resolved place, as the provider typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: BTreeSet<String>,
}

impl RawAddressComponent {
    /// Build a component tagged with the given provider types.
    pub fn new<I, S>(long_name: impl Into<String>, short_name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            long_name: long_name.into(),
            short_name: short_name.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the provider tagged this component with `kind`.
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.contains(kind)
    }
}

/// Latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Fully resolved payload for one selected prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub components: Vec<RawAddressComponent>,
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

impl PlaceDetails {
    /// First component carrying `kind`, in provider order.
    pub fn component(&self, kind: &str) -> Option<&RawAddressComponent> {
        self.components.iter().find(|c| c.has_type(kind))
    }
}

/// Normalized structured address handed to the host form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAddress {
    pub street_number: String,
    pub street_name: String,
    pub city: String,
    pub county: String,
    pub country: String,
    pub postcode: String,
    pub full_address: String,
    pub coordinates: Coordinates,
}

impl ParsedAddress {
    /// `street_number street_name` with empty parts omitted.
    pub fn street_line(&self) -> String {
        [self.street_number.trim(), self.street_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
