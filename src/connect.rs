//! SQLite connection setup.

use crate::error::IngestError;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Open (or create) the SQLite database at `path`.
///
/// Foreign-key enforcement is enabled on the connection, so a row that
/// references a missing parent fails its individual insert instead of
/// landing silently.
pub fn open_database(path: &Path) -> Result<Connection, IngestError> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    debug!("Opened SQLite database at {}", path.display());
    Ok(conn)
}
