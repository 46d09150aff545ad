//! # Identifier Newtypes
//!
//! `PlaceId` is the provider's opaque handle for a prediction. `SessionToken`
//! groups the autocomplete requests of one search session with the
//! place-details call that ends it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentifierError;

/// Opaque place identifier issued by the places provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Wrap a provider place identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::EmptyPlaceId`] for an empty or
    /// whitespace-only string.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentifierError::EmptyPlaceId);
        }
        Ok(Self(raw))
    }

    /// The identifier as sent back to the provider.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Billing session for one search-to-selection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Start a new session.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token previously rendered with `Display`.
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| IdentifierError::InvalidSessionToken {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}
