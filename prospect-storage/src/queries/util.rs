//! Shared row-mapping helpers.

use prospect_core::errors::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Map a rusqlite error into the storage error type.
pub fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Serialize a value into a JSON column.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::CorruptRow {
        table: "<serialize>".to_string(),
        message: e.to_string(),
    })
}

/// Deserialize a JSON column, attributing failures to the given table.
pub fn from_json<T: DeserializeOwned>(raw: &str, table: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::CorruptRow {
        table: table.to_string(),
        message: e.to_string(),
    })
}
