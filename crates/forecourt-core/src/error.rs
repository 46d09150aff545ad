//! # Error Types
//!
//! Errors raised by the core types. All use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! Provider and transport failures are not core errors; they belong to
//! `forecourt-places`.

use thiserror::Error;

use crate::form::AddressField;

/// An identifier failed its constructor check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The provider handed back an empty place identifier.
    #[error("place id must not be empty")]
    EmptyPlaceId,

    /// A session token string was not a UUID.
    #[error("invalid session token {value:?}: {reason}")]
    InvalidSessionToken {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Failure to interpret host form input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The host named a field the address form does not have.
    #[error("unknown address field: {0:?}")]
    UnknownField(String),

    /// A required field was left empty.
    #[error("{} is required", .field.label())]
    Required {
        /// The empty field.
        field: AddressField,
    },

    /// A postcode did not match either UK pattern.
    #[error("{value:?} is not a valid UK postcode")]
    InvalidPostcode {
        /// The rejected postcode as entered.
        value: String,
    },
}
