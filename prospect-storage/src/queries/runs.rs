//! Queries for the runs table, one row per stage invocation.
//!
//! Counters only ever increase; `add_counters` applies positive deltas so
//! `processed >= passed + failed` holds at every checkpoint a reader can
//! observe.

use prospect_core::errors::StorageError;
use prospect_core::types::{Run, RunStatus, StageName};
use rusqlite::{params, Connection, Row};

use super::util::sql_err;

fn map_run(row: &Row<'_>) -> Result<Run, rusqlite::Error> {
    let stage_raw: String = row.get(1)?;
    let status_raw: String = row.get(4)?;
    let corrupt = |message: String| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    };
    Ok(Run {
        id: row.get(0)?,
        stage: StageName::parse(&stage_raw)
            .ok_or_else(|| corrupt(format!("unknown stage '{stage_raw}'")))?,
        started_at: row.get(2)?,
        completed_at: row.get(3)?,
        status: RunStatus::parse(&status_raw)
            .ok_or_else(|| corrupt(format!("unknown run status '{status_raw}'")))?,
        processed: row.get::<_, i64>(5)? as u64,
        passed: row.get::<_, i64>(6)? as u64,
        failed: row.get::<_, i64>(7)? as u64,
        error: row.get(8)?,
        metadata: row.get(9)?,
    })
}

/// Insert a new run row (status = 'running'). Returns the run id.
pub fn insert_start(
    conn: &Connection,
    stage: StageName,
    started_at: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO runs (stage, started_at, status) VALUES (?1, ?2, 'running')",
        params![stage.as_str(), started_at],
    )
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// Increment the run counters by the given non-negative deltas.
pub fn add_counters(
    conn: &Connection,
    id: i64,
    processed: u64,
    passed: u64,
    failed: u64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE runs SET processed = processed + ?2, passed = passed + ?3,
            failed = failed + ?4
         WHERE id = ?1",
        params![id, processed as i64, passed as i64, failed as i64],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Mark a run terminal: completed, failed, or cancelled. Counters are left
/// frozen at their last checkpoint.
pub fn complete(
    conn: &Connection,
    id: i64,
    completed_at: i64,
    status: RunStatus,
    error: Option<&str>,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE runs SET completed_at = ?2, status = ?3, error = ?4 WHERE id = ?1",
        params![id, completed_at, status.as_str(), error],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Fetch a run by id.
pub fn get(conn: &Connection, id: i64) -> Result<Run, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, stage, started_at, completed_at, status, processed, passed,
                    failed, error, metadata
             FROM runs WHERE id = ?1",
        )
        .map_err(sql_err)?;
    let mut rows = stmt.query(params![id]).map_err(sql_err)?;
    match rows.next().map_err(sql_err)? {
        Some(row) => map_run(row).map_err(sql_err),
        None => Err(StorageError::RunNotFound { id }),
    }
}

/// Query recent runs, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<Run>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, stage, started_at, completed_at, status, processed, passed,
                    failed, error, metadata
             FROM runs ORDER BY started_at DESC, id DESC LIMIT ?1",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![limit as i64], map_run)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
