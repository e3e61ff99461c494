//! V001: Initial schema — leads, runs, raw_discoveries.

pub const MIGRATION_SQL: &str = r#"
-- Leads: the durable, deduplicated lead set. Primary key is the
-- deterministic identity hash, so re-collection is an upsert by design.
CREATE TABLE IF NOT EXISTS leads (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    canonical_name TEXT NOT NULL,
    address TEXT,
    city TEXT,
    region TEXT,
    country TEXT,
    phone TEXT,
    email TEXT,
    website TEXT,
    status TEXT NOT NULL DEFAULT 'new',
    score INTEGER,
    score_reasons TEXT NOT NULL DEFAULT '[]',
    active_angles TEXT NOT NULL DEFAULT '[]',
    exhausted_angles TEXT NOT NULL DEFAULT '[]',
    excluded_reason TEXT,
    cooldown_until INTEGER,
    last_contact_at INTEGER,
    last_contact_result TEXT,
    source_directories TEXT NOT NULL DEFAULT '[]',
    source_geos TEXT NOT NULL DEFAULT '[]',
    source_tags TEXT NOT NULL DEFAULT '[]',
    enrichment TEXT,
    rating REAL,
    review_count INTEGER,
    first_seen_at INTEGER NOT NULL,
    last_seen_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);
CREATE INDEX IF NOT EXISTS idx_leads_canonical ON leads(canonical_name);
CREATE INDEX IF NOT EXISTS idx_leads_cooldown ON leads(cooldown_until)
    WHERE cooldown_until IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_leads_score ON leads(score)
    WHERE score IS NOT NULL;

-- Runs: one record per stage invocation, append-only counters.
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    stage TEXT NOT NULL,
    started_at INTEGER NOT NULL,
    completed_at INTEGER,
    status TEXT NOT NULL DEFAULT 'running',
    processed INTEGER NOT NULL DEFAULT 0,
    passed INTEGER NOT NULL DEFAULT 0,
    failed INTEGER NOT NULL DEFAULT 0,
    error TEXT,
    metadata TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_runs_time ON runs(started_at DESC);

-- Raw discoveries: the staging queue. Rows exist only until the collect
-- stage consumes them into leads.
CREATE TABLE IF NOT EXISTS raw_discoveries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER,
    source TEXT NOT NULL,
    payload TEXT NOT NULL,
    discovered_at INTEGER NOT NULL,
    processed INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE INDEX IF NOT EXISTS idx_raw_discoveries_pending
    ON raw_discoveries(processed, run_id);
"#;
