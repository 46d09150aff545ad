//! # forecourt CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use forecourt_cli::address::{run_address, AddressArgs};
use forecourt_cli::config::CliConfig;

/// Forecourt back-office tooling.
///
/// Searches, resolves and decomposes UK addresses through the configured
/// places provider. The provider key is read from `PLACES_API_KEY`.
#[derive(Parser, Debug)]
#[command(name = "forecourt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Address search, resolution and decomposition.
    Address(AddressArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("forecourt CLI starting");

    let result = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => match &cli.command {
            Commands::Address(args) => run_address(args, &config).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
