use clap::Parser;
use restaurant_sim::config::{Config, SupplierMode};
use restaurant_sim::error::SimError;
use restaurant_sim::lifecycle::{setup_tracing, Restaurant};
use restaurant_sim::report::Report;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Runs the restaurant until Ctrl-C (or the given duration) and prints the
/// final report.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
struct Arguments {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides the configured restocking policy.
    #[arg(short, long, value_enum)]
    supplier_mode: Option<SupplierMode>,

    /// Stops after this many seconds instead of waiting for Ctrl-C.
    #[arg(short, long, value_name = "SECS")]
    duration: Option<u64>,

    /// Seeds the arrival stream for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Turns off the periodic dashboard line.
    #[arg(long)]
    no_dashboard: bool,

    /// Prints the report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), SimError> {
    setup_tracing();
    let arguments = Arguments::parse();

    let mut config = match &arguments.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = arguments.supplier_mode {
        config.supplier.mode = mode;
    }
    if let Some(seed) = arguments.seed {
        config.seed = Some(seed);
    }
    if arguments.no_dashboard {
        config.dashboard_interval_ms = None;
    }

    let restaurant = Restaurant::start(&config)?;
    match arguments.duration {
        Some(secs) => info!(secs, "Running for a fixed duration"),
        None => info!("Running, press Ctrl-C to close"),
    }
    let ledger = restaurant
        .run_until_stopped(arguments.duration.map(Duration::from_secs))
        .await?;

    let report = Report::from(&ledger);
    if arguments.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
