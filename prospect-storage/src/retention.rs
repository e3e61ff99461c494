//! Data retention for prospect.db.
//!
//! Leads are never deleted by retention: exclusion history is what makes
//! re-discovery idempotent. Retention only trims the operational tables:
//! - consumed raw_discoveries rows (default 30 days)
//! - terminal runs rows (default 90 days)
//! - enrichment_failures entries (default 180 days)

use rusqlite::{params, Connection};
use serde::Serialize;

use prospect_core::errors::StorageError;
use prospect_core::types::now_ms;

const DAY_MS: i64 = 86_400_000;

/// Configurable retention periods.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Consumed staging records (default 30 days).
    pub discoveries_days: u32,
    /// Finished run history (default 90 days).
    pub runs_days: u32,
    /// Enrichment failure log (default 180 days).
    pub failures_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            discoveries_days: 30,
            runs_days: 90,
            failures_days: 180,
        }
    }
}

/// Report of what was cleaned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetentionReport {
    pub total_deleted: u64,
    pub per_table: Vec<TableCleanup>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCleanup {
    pub table: String,
    pub deleted: u64,
}

/// Apply the full retention policy to prospect.db.
///
/// Runs inside a single transaction for atomicity.
/// Returns a report of how many rows were deleted per table.
pub fn apply_retention(
    conn: &Connection,
    policy: &RetentionPolicy,
) -> Result<RetentionReport, StorageError> {
    let start = std::time::Instant::now();
    let mut report = RetentionReport::default();

    // RAII transaction: auto-rollback on drop, auto-commit on .commit()
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StorageError::SqliteError {
            message: format!("retention begin: {e}"),
        })?;

    apply_retention_inner(&tx, policy, &mut report)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;

    report.duration_ms = start.elapsed().as_millis() as u64;
    report.total_deleted = report.per_table.iter().map(|t| t.deleted).sum();
    Ok(report)
}

fn apply_retention_inner(
    conn: &Connection,
    policy: &RetentionPolicy,
    report: &mut RetentionReport,
) -> Result<(), StorageError> {
    let now = now_ms();

    let discoveries_cutoff = now - policy.discoveries_days as i64 * DAY_MS;
    let runs_cutoff = now - policy.runs_days as i64 * DAY_MS;
    let failures_cutoff = now - policy.failures_days as i64 * DAY_MS;

    // Only consumed staging rows are eligible; unprocessed rows stay until
    // a collect pass drains them, however old they get.
    cleanup(
        conn,
        "raw_discoveries",
        "DELETE FROM raw_discoveries WHERE processed = 1 AND discovered_at < ?1",
        discoveries_cutoff,
        report,
    )?;

    // Running rows are never reaped, even stale ones from crashed
    // processes; completing them is the runner's job.
    cleanup(
        conn,
        "runs",
        "DELETE FROM runs WHERE status != 'running' AND started_at < ?1",
        runs_cutoff,
        report,
    )?;

    cleanup(
        conn,
        "enrichment_failures",
        "DELETE FROM enrichment_failures WHERE occurred_at < ?1",
        failures_cutoff,
        report,
    )?;

    Ok(())
}

fn cleanup(
    conn: &Connection,
    table: &str,
    sql: &str,
    cutoff: i64,
    report: &mut RetentionReport,
) -> Result<(), StorageError> {
    let deleted = conn
        .execute(sql, params![cutoff])
        .map_err(|e| StorageError::SqliteError {
            message: format!("{table}: {e}"),
        })? as u64;

    if deleted > 0 {
        report.per_table.push(TableCleanup {
            table: table.to_string(),
            deleted,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_processed_discoveries_cleaned() {
        let conn = setup_db();
        let now = now_ms();
        let old = now - 60 * DAY_MS;

        conn.execute(
            "INSERT INTO raw_discoveries (source, payload, discovered_at, processed)
             VALUES ('static', '{}', ?1, 1)",
            params![old],
        )
        .unwrap();
        // Unprocessed row of the same age must survive.
        conn.execute(
            "INSERT INTO raw_discoveries (source, payload, discovered_at, processed)
             VALUES ('static', '{}', ?1, 0)",
            params![old],
        )
        .unwrap();

        let report = apply_retention(&conn, &RetentionPolicy::default()).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM raw_discoveries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1, "unprocessed row should be kept");
        assert_eq!(report.total_deleted, 1);
    }

    #[test]
    fn test_running_rows_never_reaped() {
        let conn = setup_db();
        let old = now_ms() - 400 * DAY_MS;

        conn.execute(
            "INSERT INTO runs (stage, started_at, status) VALUES ('collect', ?1, 'running')",
            params![old],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO runs (stage, started_at, status) VALUES ('collect', ?1, 'completed')",
            params![old],
        )
        .unwrap();

        apply_retention(&conn, &RetentionPolicy::default()).unwrap();

        let statuses: Vec<String> = conn
            .prepare("SELECT status FROM runs")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(statuses, vec!["running".to_string()]);
    }

    #[test]
    fn test_empty_db_no_errors() {
        let conn = setup_db();
        let report = apply_retention(&conn, &RetentionPolicy::default()).unwrap();
        assert_eq!(report.total_deleted, 0);
    }
}
