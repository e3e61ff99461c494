//! V002: Append-only enrichment failure log.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS enrichment_failures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lead_id TEXT NOT NULL REFERENCES leads(id),
    url TEXT,
    kind TEXT NOT NULL,
    message TEXT,
    occurred_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_enrichment_failures_lead
    ON enrichment_failures(lead_id);
"#;
