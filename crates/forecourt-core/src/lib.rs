//! # forecourt-core — Foundational Types for Address Resolution
//!
//! This crate is the leaf of the Forecourt workspace. It defines the data
//! model that flows through the address-resolution pipeline, from the raw
//! shapes a places provider returns to the form-owned address a host edits.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `PlaceId` and `SessionToken` are
//!    distinct types. A session token cannot be passed where a place id is
//!    expected.
//!
//! 2. **Empty strings, never absent.** `ParsedAddress` fields are plain
//!    `String`s. A component class the provider omitted is `""`.
//!
//! 3. **One set of postcode patterns.** The full and prefix UK postcode
//!    patterns live in [`postcode`] and are shared by decomposition and form
//!    validation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `forecourt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` on runtime input outside tests.

pub mod error;
pub mod form;
pub mod identity;
pub mod place;
pub mod postcode;

pub use error::{IdentifierError, ValidationError};
pub use form::{AddressField, EditableAddress, FieldErrors, DEFAULT_COUNTRY};
pub use identity::{PlaceId, SessionToken};
pub use place::{AddressPrediction, Coordinates, ParsedAddress, PlaceDetails, RawAddressComponent};
