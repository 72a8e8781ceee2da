//! CSV-to-table loading.
//!
//! Each load reads one CSV file fully into memory, builds a parameterized
//! INSERT from the file's header row, and inserts row by row inside a single
//! transaction. Constraint violations are recorded per row and skipped; a
//! bad row never aborts the rest of the file.

use crate::error::IngestError;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::{error, info, warn};

/// Outcome of loading one CSV file into one table.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Target table name.
    pub table: String,
    /// Data rows read from the file (header excluded).
    pub rows_read: u64,
    /// Rows that were actually inserted.
    pub rows_inserted: u64,
    /// Rows that failed their insert, in file order.
    pub failures: Vec<RowFailure>,
}

impl LoadReport {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }
}

/// A single data row that failed its insert.
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based data row number (header not counted).
    pub row: u64,
    /// The row's field values as read from the file.
    pub values: Vec<String>,
    /// The underlying database or shape error.
    pub error: String,
}

/// Build a parameterized INSERT statement listing exactly `columns`.
pub fn build_insert_sql(table: &str, columns: &[String]) -> String {
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    )
}

/// Load a CSV file into `table`.
///
/// A missing or empty file is a warning, not an error: the table is left
/// unpopulated and the run continues. Empty string fields are inserted as
/// SQL NULL. Successful rows are committed together once the whole file has
/// been processed.
pub fn load_table(
    conn: &mut Connection,
    csv_path: &Path,
    table: &str,
) -> Result<LoadReport, IngestError> {
    let mut report = LoadReport::new(table);

    if !csv_path.exists() {
        warn!("{} not found, skipping", csv_path.display());
        return Ok(report);
    }

    // Flexible so that a ragged row surfaces as a row failure below instead
    // of aborting the whole file.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    if records.is_empty() {
        warn!("{} is empty, skipping", csv_path.display());
        return Ok(report);
    }

    let sql = build_insert_sql(table, &columns);
    let tx = conn.transaction()?;

    for (idx, record) in records.iter().enumerate() {
        let row_number = idx as u64 + 1;
        report.rows_read += 1;

        if record.len() != columns.len() {
            let msg = format!(
                "expected {} columns, found {}",
                columns.len(),
                record.len()
            );
            error!(
                "Error inserting row {} into {}: {}",
                row_number, table, msg
            );
            report.failures.push(RowFailure {
                row: row_number,
                values: record.iter().map(String::from).collect(),
                error: msg,
            });
            continue;
        }

        let values: Vec<Option<&str>> = record
            .iter()
            .map(|field| if field.is_empty() { None } else { Some(field) })
            .collect();

        match tx.execute(&sql, params_from_iter(values)) {
            Ok(_) => report.rows_inserted += 1,
            Err(e) => {
                error!("Error inserting row {} into {}: {}", row_number, table, e);
                error!("Row data: {:?}", record);
                report.failures.push(RowFailure {
                    row: row_number,
                    values: record.iter().map(String::from).collect(),
                    error: e.to_string(),
                });
            }
        }
    }

    tx.commit()?;

    info!(
        "Loaded {} of {} rows from {} into {}",
        report.rows_inserted,
        report.rows_read,
        csv_path.display(),
        table
    );

    Ok(report)
}
