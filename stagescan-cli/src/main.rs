//! StageScan CLI — run one sweep step or inspect the catalog.
//!
//! Commands:
//! - `run` — resolve the next security via the cursor, fetch, evaluate,
//!   report, advance the cursor
//! - `catalog` — load and validate the catalog CSV, print the cycle

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use stagescan_core::catalog::Catalog;
use stagescan_core::cursor::FileCursorStore;
use stagescan_core::data::HttpPriceProvider;
use stagescan_core::sink::{CsvSheet, DirStorage};
use stagescan_runner::{run_once, CursorOutcome, RunConfig, RunOptions};

#[derive(Parser)]
#[command(
    name = "stagescan",
    about = "StageScan CLI — round-robin stage-analysis screener"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the next security in the cycle: fetch, evaluate, report.
    Run {
        /// Path to the TOML run config.
        #[arg(long, default_value = "stagescan.toml")]
        config: PathBuf,
    },
    /// Load and validate the catalog, printing the cycle summary.
    Catalog {
        /// Path to the TOML run config.
        #[arg(long, default_value = "stagescan.toml")]
        config: PathBuf,

        /// Print every member in cycle order.
        #[arg(long, default_value_t = false)]
        full: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => cmd_run(&config),
        Commands::Catalog { config, full } => cmd_catalog(&config, full),
    };

    if let Err(err) = result {
        error!("run aborted: {err:#}");
        std::process::exit(1);
    }
}

fn cmd_run(config_path: &PathBuf) -> Result<()> {
    let config = RunConfig::from_file(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let catalog = Catalog::load(&config.catalog.path, &config.catalog.categories)
        .with_context(|| format!("loading catalog from {}", config.catalog.path.display()))?;

    let store = FileCursorStore::new(&config.cursor.path);
    let provider = HttpPriceProvider::new(&config.fetch.endpoint, config.fetch_timeout());
    let storage = DirStorage::new(&config.storage.dir);
    let sheet = CsvSheet::new(&config.sheet.path);

    let options = RunOptions {
        years: config.fetch.years.clone(),
        cursor_ttl: config.cursor_ttl(),
        upload_raw: config.storage.upload_raw,
    };

    let report = run_once(&catalog, &store, &provider, &storage, &sheet, &options)?;

    println!();
    println!("=== Sweep Step ===");
    println!("Security:   {}", report.code);
    println!(
        "Selection:  {}",
        match &report.outcome {
            CursorOutcome::Resumed { previous } => format!("resumed after {previous}"),
            CursorOutcome::ColdStart => "cold start".to_string(),
            CursorOutcome::StaleCursor { previous } =>
                format!("restarted (stale cursor {previous})"),
        }
    );
    println!("Rows:       {}", report.rows);
    match &report.signal {
        Some(signal) => println!(
            "Signal:     BUY on {} (close_adj {}, averages {}/{}/{})",
            signal.date, signal.close_adj, signal.short, signal.middle, signal.long
        ),
        None => println!("Signal:     none"),
    }
    if report.uploaded {
        println!("Raw series: uploaded to {}", config.storage.dir.display());
    }
    println!();

    Ok(())
}

fn cmd_catalog(config_path: &PathBuf, full: bool) -> Result<()> {
    let config = RunConfig::from_file(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let catalog = Catalog::load(&config.catalog.path, &config.catalog.categories)
        .with_context(|| format!("loading catalog from {}", config.catalog.path.display()))?;

    println!("Catalog:    {}", config.catalog.path.display());
    println!("Members:    {}", catalog.len());
    println!("First code: {}", catalog.first_code());
    if !config.catalog.categories.is_empty() {
        println!("Categories: {}", config.catalog.categories.join(", "));
    }

    if full {
        println!();
        for code in catalog.codes() {
            let meta = catalog.metadata_of(code)?;
            println!("{:<10} {:<24} {}", code, meta.name, meta.category);
        }
    }

    Ok(())
}
