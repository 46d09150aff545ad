//! # forecourt-cli — Forecourt Command-Line Interface
//!
//! Thin clap front end over the address pipeline crates, used to exercise
//! the provider integration from a terminal and to decompose saved
//! provider responses while debugging.
//!
//! ## Subcommands
//!
//! - `address search` — Live search through a widget instance
//! - `address resolve` — Place id to structured address
//! - `address decompose` — Offline decomposition of a saved response
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; behaviour lives in the domain crates.
//! - Handlers return `anyhow::Result<u8>` exit codes; `main` logs errors.

pub mod address;
pub mod config;
