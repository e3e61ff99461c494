//! Write connection utilities: BEGIN IMMEDIATE transactions.

use prospect_core::errors::StorageError;
use rusqlite::Connection;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// This acquires the write lock at transaction start, preventing
/// SQLITE_BUSY mid-transaction. Rolled back when the closure errors.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Connection) -> Result<T, StorageError>,
{
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        })?;

    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| StorageError::SqliteError {
                    message: format!("failed to commit: {e}"),
                })?;
            Ok(value)
        }
        Err(e) => {
            // Best-effort rollback; the original error is the one that matters.
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
