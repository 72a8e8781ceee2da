//! The linear ingest pipeline.
//!
//! Initialize → load each table in dependency order → verify → close. There
//! is no retry, rollback or resumption: schema failures are fatal, file and
//! row failures are logged and the run continues.

use crate::connect::open_database;
use crate::error::IngestError;
use crate::ingest::{load_table, LoadReport};
use crate::schema::{init_schema, TABLES};
use crate::verify::{verify_tables, TableCount};
use std::path::PathBuf;
use tracing::info;

/// Configuration for a full ingest run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// SQLite database file to (re)create.
    pub db_file: PathBuf,
    /// Directory containing the source CSV files.
    pub data_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            db_file: PathBuf::from("ecommerce.db"),
            data_dir: PathBuf::from("."),
        }
    }
}

/// Aggregated outcome of a full run.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-table load reports, in load order.
    pub loads: Vec<LoadReport>,
    /// Final row counts from the verification pass.
    pub counts: Vec<TableCount>,
}

impl RunSummary {
    /// Total rows skipped across all tables.
    pub fn rows_skipped(&self) -> u64 {
        self.loads.iter().map(|l| l.failures.len() as u64).sum()
    }

    /// Total rows inserted across all tables.
    pub fn rows_inserted(&self) -> u64 {
        self.loads.iter().map(|l| l.rows_inserted).sum()
    }
}

/// Run the full pipeline against `config`.
///
/// Destructive: the database file is rebuilt from scratch on every run,
/// which also makes back-to-back runs land on identical state.
pub fn run(config: &IngestConfig) -> Result<RunSummary, IngestError> {
    info!("Creating database and tables...");
    let mut conn = open_database(&config.db_file)?;
    init_schema(&conn)?;

    info!("Loading data from CSV files...");
    let mut loads = Vec::with_capacity(TABLES.len());
    for table in &TABLES {
        let csv_path = config.data_dir.join(table.source_file);
        loads.push(load_table(&mut conn, &csv_path, table.name)?);
    }

    info!("Verifying data...");
    let counts = verify_tables(&conn)?;

    conn.close().map_err(|(_, e)| IngestError::Database(e))?;
    info!("Database {} created successfully", config.db_file.display());

    Ok(RunSummary { loads, counts })
}
