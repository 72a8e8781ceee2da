//! Error types for the ingestion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the database or loading CSV data.
///
/// Only file-open, schema and query failures surface here; individual row
/// insert failures are collected in [`crate::ingest::LoadReport`] instead of
/// aborting the batch.
#[derive(Error, Debug)]
pub enum IngestError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A read-only command was pointed at a database that does not exist.
    #[error("database file {0:?} does not exist; run `ingest` first")]
    MissingDatabase(PathBuf),
}
