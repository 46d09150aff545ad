//! # forecourt-address — Address Resolution Pipeline
//!
//! Turns keystrokes in an address box into a structured, form-ready UK
//! address:
//!
//! ```text
//! keystrokes ─► search (debounce, sequencing) ─► PlacesProvider::predictions
//!                                                        │
//!             AddressHost ◄─ decompose ◄─ place_details ◄┘ select
//! ```
//!
//! ## Modules
//!
//! - **Search** (`search.rs`): synchronous state machine owning the query,
//!   debounce deadline, sequence number and session token.
//!
//! - **Widget** (`widget.rs`): async task driving the search machine
//!   against a [`forecourt_places::PlacesProvider`], resolving selections
//!   and invoking the host callback.
//!
//! - **Decompose** (`decompose.rs`): pure mapping from provider components
//!   to a [`forecourt_core::ParsedAddress`], with the four-tier postcode
//!   fallback.
//!
//! - **Sync** (`sync.rs`): writes a selected address into host form fields
//!   and handles manual edits.
//!
//! ## Failure Policy
//!
//! Provider failures never reach the user as errors. A failed search looks
//! like an empty one without the "no addresses found" indicator, and a
//! failed resolve leaves the form untouched. Both are logged with the
//! error's kind.

pub mod decompose;
pub mod search;
pub mod settings;
pub mod sync;
pub mod widget;

pub use decompose::{
    decompose, decompose_with_source, resolve_postcode, Decomposition, PostcodeStrategy,
    POSTCODE_STRATEGIES,
};
pub use search::{Completion, PredictionRequest, SearchMachine, SearchStatus, Selection};
pub use settings::SearchSettings;
pub use sync::{AddressFieldSync, AddressHost};
pub use widget::{
    AddressAutocomplete, AutocompleteHandle, AutocompleteProps, DisplayOptions, SearchView,
};
