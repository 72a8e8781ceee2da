//! Command-line interface for ecom-ingest
//!
//! # Usage Examples
//!
//! ## Ingest
//! ```bash
//! # Rebuild ecommerce.db from CSV files in the current directory
//! ecom-ingest ingest
//!
//! # Explicit database file and data directory
//! ecom-ingest ingest --db-file /tmp/shop.db --data-dir ./exports
//! ```
//!
//! ## Report
//! ```bash
//! # Analytics queries over a previously ingested database
//! ecom-ingest report --db-file /tmp/shop.db --limit 5
//! ```
//!
//! The ingest run is destructive: all five tables are dropped and recreated,
//! then loaded in foreign-key dependency order. Rows that violate a
//! constraint are logged and skipped without failing the run.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecom_ingest::pipeline::{self, IngestConfig};
use ecom_ingest::report;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecom-ingest")]
#[command(about = "A tool for ingesting e-commerce CSV exports into SQLite")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database from CSV files (destructive)
    Ingest {
        /// SQLite database file to (re)create
        #[arg(long, default_value = "ecommerce.db", env = "ECOM_DB_FILE")]
        db_file: PathBuf,

        /// Directory containing categories.csv, customers.csv, products.csv,
        /// orders.csv and order_items.csv (each optional)
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Run analytics queries over an ingested database
    Report {
        /// SQLite database file to query
        #[arg(long, default_value = "ecommerce.db", env = "ECOM_DB_FILE")]
        db_file: PathBuf,

        /// Maximum rows for the top-N queries
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing; default to info so progress and warnings are
    // visible without RUST_LOG set.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { db_file, data_dir } => {
            let config = IngestConfig { db_file, data_dir };
            let summary = pipeline::run(&config).context("Ingest failed")?;

            // Skipped rows do not fail the run; they are visible in the logs
            // and in the summary.
            if summary.rows_skipped() > 0 {
                tracing::warn!(
                    "{} rows were skipped due to constraint violations",
                    summary.rows_skipped()
                );
            }
        }
        Commands::Report { db_file, limit } => {
            report::run_report(&db_file, limit).context("Report failed")?;
        }
    }

    Ok(())
}
