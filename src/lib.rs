//! ecom-ingest Library
//!
//! A library for ingesting e-commerce CSV exports into a SQLite database.
//!
//! # Features
//!
//! - Fresh schema per run: five tables (categories, customers, products,
//!   orders, order_items) dropped and recreated with their primary and
//!   foreign keys
//! - Dependency-ordered loading: parents are populated before children so
//!   foreign keys resolve at insert time
//! - Per-row error tolerance: a constraint violation skips that row, logs
//!   it, and the rest of the file still loads
//! - Verification: a final row-count pass over every table
//! - Analytics: read-only join queries over an ingested database
//!
//! # CLI Usage
//!
//! ```bash
//! # Rebuild ecommerce.db from CSV files in the current directory
//! ecom-ingest ingest
//!
//! # Custom locations
//! ecom-ingest ingest --db-file /tmp/shop.db --data-dir ./exports
//!
//! # Analytics over an ingested database
//! ecom-ingest report --db-file /tmp/shop.db --limit 5
//! ```

pub mod connect;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod verify;

pub use error::IngestError;
pub use ingest::{build_insert_sql, load_table, LoadReport, RowFailure};
pub use pipeline::{run, IngestConfig, RunSummary};
pub use verify::{verify_tables, TableCount};
