//! Queries for the raw_discoveries staging queue.

use prospect_core::errors::StorageError;
use prospect_core::types::{RawBusinessData, RawDiscovery};
use rusqlite::{params, Connection};

use super::util::{from_json, sql_err, to_json};

/// Stage a raw record. Returns the row id.
pub fn insert(
    conn: &Connection,
    run_id: Option<i64>,
    source: &str,
    data: &RawBusinessData,
    discovered_at: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO raw_discoveries (run_id, source, payload, discovered_at, processed)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![run_id, source, to_json(data)?, discovered_at],
    )
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// Unprocessed staging records in discovery order.
pub fn unprocessed(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<RawDiscovery>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, run_id, source, payload, discovered_at, processed
             FROM raw_discoveries WHERE processed = 0
             ORDER BY id ASC LIMIT ?1",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![limit.map(i64::from).unwrap_or(i64::MAX)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })
        .map_err(sql_err)?;

    let mut out = Vec::new();
    for row in rows {
        let (id, run_id, source, payload, discovered_at, processed) = row.map_err(sql_err)?;
        let data: RawBusinessData = from_json(&payload, "raw_discoveries")?;
        out.push(RawDiscovery {
            id,
            run_id,
            source,
            data,
            discovered_at,
            processed: processed != 0,
        });
    }
    Ok(out)
}

/// Mark a staging record consumed.
pub fn mark_processed(conn: &Connection, id: i64) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE raw_discoveries SET processed = 1 WHERE id = ?1",
        params![id],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Count of unconsumed staging records.
pub fn count_unprocessed(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM raw_discoveries WHERE processed = 0",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|c| c as u64)
    .map_err(sql_err)
}
