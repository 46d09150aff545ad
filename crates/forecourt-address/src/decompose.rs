//! # Address Decomposition Engine
//!
//! Pure mapping from provider components to a [`ParsedAddress`]. For every
//! field the first component carrying the wanted type wins, in provider
//! order.
//!
//! ## Postcode Fallback
//!
//! Structured provider data always beats inference from the formatted
//! string, and a full postcode always beats an outward code:
//!
//! | Tier | Strategy | Source |
//! |------|----------|--------|
//! | 1 | `StructuredFull` | `postal_code` component |
//! | 2 | `StructuredPrefix` | `postal_code_prefix` component |
//! | 3 | `RegexFull` | full UK postcode found in `formatted_address` |
//! | 4 | `RegexPrefix` | outward code found in `formatted_address` |
//!
//! When every tier comes up empty the postcode is `""` and the source is
//! `PostcodeStrategy::None`. That is not an error here; form validation
//! decides whether the address is acceptable.

use forecourt_core::{postcode, ParsedAddress, PlaceDetails};
use serde::Serialize;

/// Where a decomposed postcode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostcodeStrategy {
    StructuredFull,
    StructuredPrefix,
    RegexFull,
    RegexPrefix,
    /// No tier produced a postcode.
    None,
}

/// Tiers in priority order.
pub const POSTCODE_STRATEGIES: [PostcodeStrategy; 4] = [
    PostcodeStrategy::StructuredFull,
    PostcodeStrategy::StructuredPrefix,
    PostcodeStrategy::RegexFull,
    PostcodeStrategy::RegexPrefix,
];

impl PostcodeStrategy {
    /// Run this single tier against `details`.
    pub fn extract(self, details: &PlaceDetails) -> Option<String> {
        match self {
            Self::StructuredFull => component_value(details, "postal_code").map(str::to_string),
            Self::StructuredPrefix => {
                component_value(details, "postal_code_prefix").map(str::to_string)
            }
            Self::RegexFull => postcode::find_full(&details.formatted_address).map(postcode::normalize),
            Self::RegexPrefix => {
                postcode::find_prefix(&details.formatted_address).map(|m| m.to_ascii_uppercase())
            }
            Self::None => Option::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredFull => "structured_full",
            Self::StructuredPrefix => "structured_prefix",
            Self::RegexFull => "regex_full",
            Self::RegexPrefix => "regex_prefix",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for PostcodeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decomposed address plus the tier that produced its postcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decomposition {
    pub address: ParsedAddress,
    pub postcode_source: PostcodeStrategy,
}

/// Walk the tiers in order and return the first non-empty postcode.
pub fn resolve_postcode(details: &PlaceDetails) -> (String, PostcodeStrategy) {
    POSTCODE_STRATEGIES
        .iter()
        .find_map(|tier| tier.extract(details).map(|code| (code, *tier)))
        .unwrap_or((String::new(), PostcodeStrategy::None))
}

/// Map provider details onto the fixed address shape.
pub fn decompose(details: &PlaceDetails) -> ParsedAddress {
    decompose_with_source(details).address
}

/// [`decompose`], also reporting which postcode tier was used.
pub fn decompose_with_source(details: &PlaceDetails) -> Decomposition {
    let field = |kinds: &[&str]| -> String {
        kinds
            .iter()
            .find_map(|kind| component_value(details, kind))
            .unwrap_or_default()
            .to_string()
    };
    let (postcode, postcode_source) = resolve_postcode(details);

    Decomposition {
        address: ParsedAddress {
            street_number: field(&["street_number"]),
            street_name: field(&["route"]),
            city: field(&["postal_town", "locality"]),
            county: field(&["administrative_area_level_2"]),
            country: field(&["country"]),
            postcode,
            full_address: details.formatted_address.clone(),
            coordinates: details.coordinates,
        },
        postcode_source,
    }
}

/// Trimmed long name of the first component typed `kind` that is not blank.
fn component_value<'a>(details: &'a PlaceDetails, kind: &str) -> Option<&'a str> {
    details
        .components
        .iter()
        .filter(|c| c.has_type(kind))
        .map(|c| c.long_name.trim())
        .find(|v| !v.is_empty())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use forecourt_core::{Coordinates, RawAddressComponent};
    use proptest::prelude::*;

    const KINDS: [&str; 9] = [
        "street_number",
        "route",
        "postal_town",
        "locality",
        "administrative_area_level_2",
        "country",
        "postal_code",
        "postal_code_prefix",
        "political",
    ];

    fn component() -> impl Strategy<Value = RawAddressComponent> {
        (
            "[A-Za-z0-9 ]{0,16}",
            prop::collection::btree_set(prop::sample::select(KINDS.to_vec()), 1..3),
        )
            .prop_map(|(name, kinds)| RawAddressComponent::new(name.clone(), name, kinds))
    }

    fn place_details() -> impl Strategy<Value = PlaceDetails> {
        (
            prop::collection::vec(component(), 0..8),
            "[A-Za-z0-9 ,]{0,48}",
            -90.0f64..90.0,
            -180.0f64..180.0,
        )
            .prop_map(|(components, formatted_address, lat, lng)| PlaceDetails {
                components,
                formatted_address,
                coordinates: Coordinates { lat, lng },
            })
    }

    proptest! {
        /// Identical input always yields identical output.
        #[test]
        fn decompose_is_deterministic(d in place_details()) {
            prop_assert_eq!(decompose_with_source(&d), decompose_with_source(&d));
        }

        /// Full address and coordinates pass through untouched.
        #[test]
        fn formatted_address_and_coordinates_are_verbatim(d in place_details()) {
            let addr = decompose(&d);
            prop_assert_eq!(&addr.full_address, &d.formatted_address);
            prop_assert_eq!(addr.coordinates, d.coordinates);
        }

        /// The reported tier is consistent with the postcode it produced.
        #[test]
        fn postcode_source_matches_postcode(d in place_details()) {
            let out = decompose_with_source(&d);
            let empty = out.address.postcode.is_empty();
            prop_assert_eq!(empty, out.postcode_source == PostcodeStrategy::None);
            if !empty {
                prop_assert_eq!(out.postcode_source.extract(&d), Some(out.address.postcode.clone()));
            }
        }
    }
}
