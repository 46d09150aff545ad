//! # Form-Facing Address
//!
//! `EditableAddress` is the long-lived representation a host form owns. It is
//! filled either from a resolved `ParsedAddress` or by the user typing into
//! the manual fields, and validated here before the host persists it.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::postcode;

/// Country assumed before the form has been populated.
pub const DEFAULT_COUNTRY: &str = "United Kingdom";

/// The manually editable address fields every host form embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Street,
    Address2,
    City,
    County,
    #[serde(rename = "postcode")]
    PostCode,
    Country,
}

impl AddressField {
    /// Every field, in form order.
    pub const ALL: [AddressField; 6] = [
        Self::Street,
        Self::Address2,
        Self::City,
        Self::County,
        Self::PostCode,
        Self::Country,
    ];

    /// Key used in the host's error map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Address2 => "address2",
            Self::City => "city",
            Self::County => "county",
            Self::PostCode => "postcode",
            Self::Country => "country",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Address2 => "Address line 2",
            Self::City => "City",
            Self::County => "County",
            Self::PostCode => "Postcode",
            Self::Country => "Country",
        }
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressField {
    type Err = ValidationError;

    /// Accepts the names host forms use: `postCode`, `post_code` and
    /// `postcode` all name the same field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "street" | "address" | "addressline1" | "line1" => Ok(Self::Street),
            "address2" | "addressline2" | "line2" => Ok(Self::Address2),
            "city" | "town" => Ok(Self::City),
            "county" => Ok(Self::County),
            "postcode" => Ok(Self::PostCode),
            "country" => Ok(Self::Country),
            _ => Err(ValidationError::UnknownField(s.to_string())),
        }
    }
}

/// Validation messages keyed by field, as the host form displays them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<AddressField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`, replacing any earlier message.
    pub fn insert(&mut self, field: AddressField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the message for `field`, returning it if there was one.
    pub fn clear(&mut self, field: AddressField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: AddressField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AddressField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Address as the host form holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableAddress {
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub county: String,
    pub post_code: String,
    pub country: String,
}

impl Default for EditableAddress {
    fn default() -> Self {
        Self {
            street: String::new(),
            address2: None,
            city: String::new(),
            county: String::new(),
            post_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl EditableAddress {
    /// Current value of `field`; an unset line 2 reads as `""`.
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Street => &self.street,
            AddressField::Address2 => self.address2.as_deref().unwrap_or(""),
            AddressField::City => &self.city,
            AddressField::County => &self.county,
            AddressField::PostCode => &self.post_code,
            AddressField::Country => &self.country,
        }
    }

    /// Overwrite exactly one field. Clearing line 2 unsets it.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::Street => self.street = value,
            AddressField::Address2 => {
                self.address2 = if value.is_empty() { None } else { Some(value) }
            }
            AddressField::City => self.city = value,
            AddressField::County => self.county = value,
            AddressField::PostCode => self.post_code = value,
            AddressField::Country => self.country = value,
        }
    }

    /// Whether the user or a selection has filled anything beyond the
    /// default country.
    pub fn is_blank(&self) -> bool {
        AddressField::ALL
            .iter()
            .filter(|f| **f != AddressField::Country)
            .all(|f| self.get(*f).trim().is_empty())
    }

    /// One-line rendering used to seed the search box from host state.
    pub fn single_line(&self) -> String {
        [
            AddressField::Street,
            AddressField::Address2,
            AddressField::City,
            AddressField::County,
            AddressField::PostCode,
        ]
        .iter()
        .map(|f| self.get(*f).trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Every rule the address currently breaks, in form order.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for field in [AddressField::Street, AddressField::City, AddressField::PostCode] {
            if self.get(field).trim().is_empty() {
                errors.push(ValidationError::Required { field });
            }
        }
        let post_code = self.post_code.trim();
        if !post_code.is_empty() && !postcode::is_valid(post_code) {
            errors.push(ValidationError::InvalidPostcode {
                value: post_code.to_string(),
            });
        }
        errors
    }

    /// Validation messages keyed the way the host's error map is keyed.
    pub fn validate(&self) -> FieldErrors {
        let mut out = FieldErrors::new();
        for err in self.validation_errors() {
            let field = match &err {
                ValidationError::Required { field } => *field,
                ValidationError::InvalidPostcode { .. } => AddressField::PostCode,
                ValidationError::UnknownField(_) => continue,
            };
            out.insert(field, err.to_string());
        }
        out
    }
}
