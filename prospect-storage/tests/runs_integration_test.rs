//! Integration tests for run history and the raw-discovery staging queue.

use prospect_core::errors::StorageError;
use prospect_core::types::{FetchFailure, RawBusinessData, RunStatus, StageName};
use prospect_storage::queries::{enrichment_failures, raw_discoveries, runs};
use prospect_storage::DatabaseManager;

fn raw(name: &str) -> RawBusinessData {
    RawBusinessData {
        name: name.to_string(),
        address: None,
        city: Some("austin".to_string()),
        region: Some("tx".to_string()),
        country: None,
        phone: None,
        email: None,
        website: None,
        rating: None,
        review_count: None,
        directory: Some("test-directory".to_string()),
        geo: Some("austin".to_string()),
        tags: Vec::new(),
    }
}

#[test]
fn run_lifecycle_accumulates_counters() {
    let db = DatabaseManager::open_in_memory().unwrap();

    let id = db
        .with_writer(|c| runs::insert_start(c, StageName::Filter, 1_000))
        .unwrap();

    db.with_writer(|c| runs::add_counters(c, id, 10, 8, 2)).unwrap();
    db.with_writer(|c| runs::add_counters(c, id, 5, 5, 0)).unwrap();

    let mid = db.with_reader(|c| runs::get(c, id)).unwrap();
    assert_eq!(mid.status, RunStatus::Running);
    assert_eq!(mid.processed, 15);
    assert_eq!(mid.passed, 13);
    assert_eq!(mid.failed, 2);
    assert!(mid.processed >= mid.passed + mid.failed);

    db.with_writer(|c| runs::complete(c, id, 2_000, RunStatus::Completed, None))
        .unwrap();

    let done = db.with_reader(|c| runs::get(c, id)).unwrap();
    assert_eq!(done.status, RunStatus::Completed);
    assert_eq!(done.completed_at, Some(2_000));
    assert_eq!(done.processed, 15);
}

#[test]
fn failed_run_keeps_partial_counters_and_error() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let id = db
        .with_writer(|c| runs::insert_start(c, StageName::Enrich, 1_000))
        .unwrap();
    db.with_writer(|c| runs::add_counters(c, id, 3, 1, 2)).unwrap();
    db.with_writer(|c| {
        runs::complete(c, id, 1_500, RunStatus::Failed, Some("source unavailable"))
    })
    .unwrap();

    let run = db.with_reader(|c| runs::get(c, id)).unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.error.as_deref(), Some("source unavailable"));
    assert_eq!(run.processed, 3);
}

#[test]
fn missing_run_is_a_typed_error() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let err = db.with_reader(|c| runs::get(c, 999)).unwrap_err();
    assert!(matches!(err, StorageError::RunNotFound { id: 999 }));
}

#[test]
fn recent_runs_come_back_newest_first() {
    let db = DatabaseManager::open_in_memory().unwrap();
    for (stage, t) in [
        (StageName::Collect, 1_000),
        (StageName::Filter, 2_000),
        (StageName::Score, 3_000),
    ] {
        db.with_writer(|c| runs::insert_start(c, stage, t)).unwrap();
    }

    let recent = db.with_reader(|c| runs::query_recent(c, 2)).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].stage, StageName::Score);
    assert_eq!(recent[1].stage, StageName::Filter);
}

#[test]
fn staging_queue_drains_in_discovery_order() {
    let db = DatabaseManager::open_in_memory().unwrap();

    let first = db
        .with_writer(|c| raw_discoveries::insert(c, None, "static", &raw("First Co"), 1_000))
        .unwrap();
    db.with_writer(|c| raw_discoveries::insert(c, None, "static", &raw("Second Co"), 2_000))
        .unwrap();

    assert_eq!(
        db.with_reader(|c| raw_discoveries::count_unprocessed(c)).unwrap(),
        2
    );

    let pending = db
        .with_reader(|c| raw_discoveries::unprocessed(c, None))
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].data.name, "First Co");
    assert!(!pending[0].processed);

    db.with_writer(|c| raw_discoveries::mark_processed(c, first)).unwrap();

    let pending = db
        .with_reader(|c| raw_discoveries::unprocessed(c, None))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].data.name, "Second Co");
    assert_eq!(
        db.with_reader(|c| raw_discoveries::count_unprocessed(c)).unwrap(),
        1
    );
}

#[test]
fn enrichment_failures_append_per_lead() {
    let db = DatabaseManager::open_in_memory().unwrap();

    // The failure log references leads, so a lead row must exist first.
    db.with_writer(|c| {
        c.execute(
            "INSERT INTO leads (id, name, canonical_name, first_seen_at, last_seen_at,
                created_at, updated_at)
             VALUES ('lead-1', 'Acme', 'acme', 1000, 1000, 1000, 1000)",
            [],
        )
        .map(|_| ())
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
    })
    .unwrap();

    db.with_writer(|c| {
        enrichment_failures::insert(
            c,
            "lead-1",
            Some("https://acme.example"),
            FetchFailure::Timeout,
            Some("read timed out"),
            1_500,
        )
    })
    .unwrap();
    db.with_writer(|c| {
        enrichment_failures::insert(c, "lead-1", None, FetchFailure::DnsError, None, 2_000)
    })
    .unwrap();

    let log = db
        .with_reader(|c| enrichment_failures::for_lead(c, "lead-1"))
        .unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, FetchFailure::Timeout);
    assert_eq!(log[0].url.as_deref(), Some("https://acme.example"));
    assert_eq!(log[1].kind, FetchFailure::DnsError);
    assert!(log[1].occurred_at > log[0].occurred_at);
}
