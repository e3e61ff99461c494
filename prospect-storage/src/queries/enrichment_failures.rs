//! Queries for the append-only enrichment failure log.

use prospect_core::errors::StorageError;
use prospect_core::types::{EnrichmentFailure, FetchFailure};
use rusqlite::{params, Connection};

use super::util::sql_err;

/// Append a failure entry for a lead. Returns the row id.
pub fn insert(
    conn: &Connection,
    lead_id: &str,
    url: Option<&str>,
    kind: FetchFailure,
    message: Option<&str>,
    occurred_at: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO enrichment_failures (lead_id, url, kind, message, occurred_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![lead_id, url, kind.as_str(), message, occurred_at],
    )
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// All failure entries for a lead, oldest first.
pub fn for_lead(
    conn: &Connection,
    lead_id: &str,
) -> Result<Vec<EnrichmentFailure>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, lead_id, url, kind, message, occurred_at
             FROM enrichment_failures WHERE lead_id = ?1 ORDER BY id ASC",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![lead_id], |row| {
            let kind_raw: String = row.get(3)?;
            let kind = FetchFailure::parse(&kind_raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("unknown failure kind '{kind_raw}'"),
                    )),
                )
            })?;
            Ok(EnrichmentFailure {
                id: row.get(0)?,
                lead_id: row.get(1)?,
                url: row.get(2)?,
                kind,
                message: row.get(4)?,
                occurred_at: row.get(5)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
