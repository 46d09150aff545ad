//! # Form Field Synchronizer
//!
//! Bridges a resolved [`ParsedAddress`] into a host form's editable fields.
//!
//! Two kinds of event write to the form, and each touches a fixed set of
//! fields:
//!
//! | Event | Writes | Clears errors |
//! |-------|--------|---------------|
//! | address selected | street, city, county, postcode, country | street, city, postcode |
//! | manual edit | the edited field only | the edited field only |
//!
//! Address line 2 is never written by a selection. Manual edits are never
//! reverted by anything except a later selection.

use forecourt_core::{AddressField, EditableAddress, FieldErrors, ParsedAddress, ValidationError};

/// Selection always leaves these fields error-free.
pub const SELECTION_CLEARS: [AddressField; 3] =
    [AddressField::Street, AddressField::City, AddressField::PostCode];

/// A form that holds an editable address and its validation messages.
///
/// Implementors provide storage; the provided methods carry the
/// synchronization rules.
pub trait AddressHost {
    fn address(&self) -> &EditableAddress;
    fn address_mut(&mut self) -> &mut EditableAddress;
    fn errors_mut(&mut self) -> &mut FieldErrors;

    /// Overwrite the selection-owned fields from a resolved address.
    fn on_address_select(&mut self, parsed: &ParsedAddress) {
        let address = self.address_mut();
        address.street = parsed.street_line();
        address.city = parsed.city.clone();
        address.county = parsed.county.clone();
        address.post_code = parsed.postcode.clone();
        address.country = parsed.country.clone();

        let errors = self.errors_mut();
        for field in SELECTION_CLEARS {
            errors.clear(field);
        }
    }

    /// A manual edit of one field.
    fn update_field(&mut self, field: AddressField, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.address_mut().set(field, value);
        self.errors_mut().clear(field);
    }

    /// [`AddressHost::update_field`] keyed by form field name.
    fn update_named(&mut self, name: &str, value: impl Into<String>) -> Result<AddressField, ValidationError>
    where
        Self: Sized,
    {
        let field: AddressField = name.parse()?;
        self.update_field(field, value);
        Ok(field)
    }

    /// Country comes from the selected address and is shown read-only
    /// once it has a value.
    fn country_read_only(&self) -> bool {
        !self.address().country.trim().is_empty()
    }

    /// Text to seed the search box with when the form opens on an
    /// existing address.
    fn search_seed(&self) -> String {
        self.address().single_line()
    }
}

/// Standalone host for forms that keep no state of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressFieldSync {
    address: EditableAddress,
    errors: FieldErrors,
}

impl AddressFieldSync {
    pub fn new(address: EditableAddress) -> Self {
        Self {
            address,
            errors: FieldErrors::new(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Run form validation and keep its messages. Returns `true` when the
    /// address is acceptable.
    pub fn validate(&mut self) -> bool {
        self.errors = self.address.validate();
        self.errors.is_empty()
    }

    pub fn into_parts(self) -> (EditableAddress, FieldErrors) {
        (self.address, self.errors)
    }
}

impl AddressHost for AddressFieldSync {
    fn address(&self) -> &EditableAddress {
        &self.address
    }

    fn address_mut(&mut self) -> &mut EditableAddress {
        &mut self.address
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }
}
