//! # Address Subcommand
//!
//! - `search` — Type a query into a live widget instance, list the
//!   predictions, and optionally select one.
//! - `resolve` — Fetch and decompose one place by id.
//! - `decompose` — Decompose a saved place-details response offline.
//!
//! `search --select` and `resolve` print JSON; `search` alone prints one
//! prediction per line unless `--json` is given.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use forecourt_address::{
    decompose_with_source, AddressAutocomplete, AddressFieldSync, AddressHost, AutocompleteProps,
    Decomposition, SearchStatus, SearchView,
};
use forecourt_core::{EditableAddress, FieldErrors, ParsedAddress, PlaceDetails, PlaceId};
use forecourt_places::wire::{DetailsResponse, WirePlace};
use forecourt_places::{Lookup, PlacesClient, PlacesProvider, ProviderStatus};

use crate::config::CliConfig;

/// Arguments for the `forecourt address` subcommand.
#[derive(Args, Debug)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Search for addresses matching a query.
    Search {
        /// Free-text query, at least three characters.
        query: String,
        /// Resolve the prediction at this zero-based index and print the
        /// form fields it fills.
        #[arg(long)]
        select: Option<usize>,
        /// Print the full search view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a place id to a structured address.
    Resolve {
        /// Provider place id, as listed by `search --json`.
        place_id: String,
    },

    /// Decompose a saved place-details JSON file without calling the provider.
    Decompose {
        /// Either a full details response or its `result` object.
        file: PathBuf,
    },
}

/// Output of `search --select`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    pub address: ParsedAddress,
    pub fields: EditableAddress,
    pub errors: FieldErrors,
}

/// Execute the address subcommand.
pub async fn run_address(args: &AddressArgs, config: &CliConfig) -> Result<u8> {
    match &args.command {
        AddressCommand::Search {
            query,
            select,
            json,
        } => {
            let client = Arc::new(PlacesClient::new(config.places_config()?)?);
            cmd_search(client, config, query, *select, *json).await
        }
        AddressCommand::Resolve { place_id } => {
            let client = PlacesClient::new(config.places_config()?)?;
            cmd_resolve(&client, place_id).await
        }
        AddressCommand::Decompose { file } => cmd_decompose(file),
    }
}

pub async fn cmd_search<P>(
    provider: Arc<P>,
    config: &CliConfig,
    query: &str,
    select: Option<usize>,
    json: bool,
) -> Result<u8>
where
    P: PlacesProvider + ?Sized + 'static,
{
    let (tx, mut selected) = mpsc::unbounded_channel();
    let mut widget = AddressAutocomplete::spawn(
        provider,
        config.search,
        AutocompleteProps::default(),
        move |address| {
            let _ = tx.send(address);
        },
    );

    widget.input(query);
    let view = widget.settled().await.context("address widget stopped")?;
    check_search(&view, config.search.min_query_len)?;

    let Some(index) = select else {
        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_predictions(&view);
        }
        return Ok(0);
    };

    let Some(prediction) = view.predictions.get(index) else {
        bail!(
            "no prediction at index {index}; the search returned {}",
            view.predictions.len()
        );
    };
    tracing::info!(place_id = %prediction.place_id, "selecting prediction");

    widget.select(index);
    widget.settled().await.context("address widget stopped")?;
    let address = selected
        .try_recv()
        .context("selected address could not be resolved")?;

    let mut form = AddressFieldSync::default();
    form.on_address_select(&address);
    form.validate();
    let (fields, errors) = form.into_parts();
    let report = SelectionReport {
        address,
        fields,
        errors,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

fn check_search(view: &SearchView, min_query_len: usize) -> Result<()> {
    match view.status {
        SearchStatus::Error => bail!("address search failed; run with -v for details"),
        SearchStatus::Idle if view.predictions.is_empty() => {
            bail!("query must be at least {min_query_len} characters")
        }
        _ => Ok(()),
    }
}

fn print_predictions(view: &SearchView) {
    if view.show_no_results {
        println!("No UK addresses found");
        return;
    }
    for (i, p) in view.predictions.iter().enumerate() {
        println!("  [{i}] {}", p.description);
    }
}

pub async fn cmd_resolve<P>(provider: &P, place_id: &str) -> Result<u8>
where
    P: PlacesProvider + ?Sized,
{
    let place_id = PlaceId::new(place_id)?;
    match provider.place_details(&place_id, None).await? {
        Lookup::Found(details) => {
            let decomposition = decompose_with_source(&details);
            println!("{}", serde_json::to_string_pretty(&decomposition)?);
            Ok(0)
        }
        Lookup::Empty => bail!("no place found for id {place_id}"),
    }
}

/// Saved provider payload: the whole response or just its `result`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SavedDetails {
    Response(DetailsResponse),
    Place(WirePlace),
}

pub fn load_saved_details(path: &Path) -> Result<PlaceDetails> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let saved: SavedDetails = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a place-details JSON document", path.display()))?;
    let place = match saved {
        SavedDetails::Response(resp) => {
            let status = ProviderStatus::parse(&resp.status);
            if status != ProviderStatus::Ok {
                bail!("saved response has status {status}");
            }
            resp.result
                .with_context(|| format!("{} has no result object", path.display()))?
        }
        SavedDetails::Place(place) => place,
    };
    Ok(place.into_place_details())
}

pub fn cmd_decompose(path: &Path) -> Result<u8> {
    let details = load_saved_details(path)?;
    let decomposition: Decomposition = decompose_with_source(&details);
    tracing::debug!(postcode_source = %decomposition.postcode_source, "decomposed saved details");
    println!("{}", serde_json::to_string_pretty(&decomposition)?);
    Ok(0)
}
