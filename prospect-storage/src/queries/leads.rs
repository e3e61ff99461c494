//! Queries for the leads table — upsert, stage-scoped selection, and the
//! independent partial updates every stage persists through.
//!
//! Every mutation bumps `updated_at` with `MAX(updated_at, ?now)` so
//! timestamps never move backwards. Selection is stable-ordered by
//! `(created_at, id)` so repeated limited runs make forward progress
//! instead of re-reading the same head of the queue.

use prospect_core::errors::StorageError;
use prospect_core::types::{AngleType, EnrichmentData, Lead, LeadStatus, StageName};
use rusqlite::{params, Connection, Row};

use super::util::{sql_err, to_json};

const LEAD_COLUMNS: &str = "id, name, canonical_name, address, city, region, country, \
     phone, email, website, status, score, score_reasons, active_angles, \
     exhausted_angles, excluded_reason, cooldown_until, last_contact_at, \
     last_contact_result, source_directories, source_geos, source_tags, \
     enrichment, rating, review_count, first_seen_at, last_seen_at, \
     created_at, updated_at";

fn map_lead(row: &Row<'_>) -> Result<Lead, rusqlite::Error> {
    let status_raw: String = row.get(10)?;
    let score_reasons_raw: String = row.get(12)?;
    let active_raw: String = row.get(13)?;
    let exhausted_raw: String = row.get(14)?;
    let dirs_raw: String = row.get(19)?;
    let geos_raw: String = row.get(20)?;
    let tags_raw: String = row.get(21)?;
    let enrichment_raw: Option<String> = row.get(22)?;

    let corrupt = |message: String| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    };

    let status = LeadStatus::parse(&status_raw)
        .ok_or_else(|| corrupt(format!("unknown status '{status_raw}'")))?;
    let parse_json = |raw: &str| -> Result<Vec<String>, rusqlite::Error> {
        serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))
    };
    let parse_angles = |raw: &str| -> Result<Vec<AngleType>, rusqlite::Error> {
        serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))
    };
    let enrichment: Option<EnrichmentData> = match enrichment_raw {
        Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?),
        None => None,
    };

    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        canonical_name: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        region: row.get(5)?,
        country: row.get(6)?,
        phone: row.get(7)?,
        email: row.get(8)?,
        website: row.get(9)?,
        status,
        score: row.get::<_, Option<i64>>(11)?.map(|s| s as u32),
        score_reasons: parse_json(&score_reasons_raw)?,
        active_angles: parse_angles(&active_raw)?,
        exhausted_angles: parse_angles(&exhausted_raw)?,
        excluded_reason: row.get(15)?,
        cooldown_until: row.get(16)?,
        last_contact_at: row.get(17)?,
        last_contact_result: row.get(18)?,
        source_directories: parse_json(&dirs_raw)?,
        source_geos: parse_json(&geos_raw)?,
        source_tags: parse_json(&tags_raw)?,
        enrichment,
        rating: row.get(23)?,
        review_count: row.get::<_, Option<i64>>(24)?.map(|c| c as u32),
        first_seen_at: row.get(25)?,
        last_seen_at: row.get(26)?,
        created_at: row.get(27)?,
        updated_at: row.get(28)?,
    })
}

/// Point lookup by identity key.
pub fn get(conn: &Connection, id: &str) -> Result<Option<Lead>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"))
        .map_err(sql_err)?;
    let mut rows = stmt.query(params![id]).map_err(sql_err)?;
    match rows.next().map_err(sql_err)? {
        Some(row) => Ok(Some(map_lead(row).map_err(sql_err)?)),
        None => Ok(None),
    }
}

/// Idempotent upsert by identity key. Returns true when a new lead row was
/// inserted, false when an existing lead was merged.
///
/// Merge semantics: fill missing contact/address fields from the candidate,
/// union source metadata, take the newer rating/review count, bump
/// `last_seen_at`/`updated_at`. `first_seen_at`, `created_at`, status,
/// score, angles, exclusion, and cooldown are never touched by a merge —
/// re-discovery must not reset pipeline progress.
pub fn upsert(conn: &Connection, candidate: &Lead, now: i64) -> Result<bool, StorageError> {
    match get(conn, &candidate.id)? {
        None => {
            let mut stmt = conn
                .prepare_cached(&format!(
                    "INSERT INTO leads ({LEAD_COLUMNS}) VALUES \
                     (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
                      ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, \
                      ?27, ?28, ?29)"
                ))
                .map_err(sql_err)?;
            stmt.execute(params![
                candidate.id,
                candidate.name,
                candidate.canonical_name,
                candidate.address,
                candidate.city,
                candidate.region,
                candidate.country,
                candidate.phone,
                candidate.email,
                candidate.website,
                candidate.status.as_str(),
                candidate.score.map(|s| s as i64),
                to_json(&candidate.score_reasons)?,
                to_json(&candidate.active_angles)?,
                to_json(&candidate.exhausted_angles)?,
                candidate.excluded_reason,
                candidate.cooldown_until,
                candidate.last_contact_at,
                candidate.last_contact_result,
                to_json(&candidate.source_directories)?,
                to_json(&candidate.source_geos)?,
                to_json(&candidate.source_tags)?,
                match &candidate.enrichment {
                    Some(e) => Some(to_json(e)?),
                    None => None,
                },
                candidate.rating,
                candidate.review_count.map(|c| c as i64),
                candidate.first_seen_at,
                candidate.last_seen_at,
                candidate.created_at,
                candidate.updated_at,
            ])
            .map_err(sql_err)?;
            Ok(true)
        }
        Some(existing) => {
            let mut dirs = existing.source_directories.clone();
            for d in &candidate.source_directories {
                if !dirs.contains(d) {
                    dirs.push(d.clone());
                }
            }
            let mut geos = existing.source_geos.clone();
            for g in &candidate.source_geos {
                if !geos.contains(g) {
                    geos.push(g.clone());
                }
            }
            let mut tags = existing.source_tags.clone();
            for t in &candidate.source_tags {
                if !tags.contains(t) {
                    tags.push(t.clone());
                }
            }

            let mut stmt = conn
                .prepare_cached(
                    "UPDATE leads SET
                        address = COALESCE(address, ?2),
                        phone = COALESCE(phone, ?3),
                        email = COALESCE(email, ?4),
                        website = COALESCE(website, ?5),
                        rating = COALESCE(?6, rating),
                        review_count = COALESCE(?7, review_count),
                        source_directories = ?8,
                        source_geos = ?9,
                        source_tags = ?10,
                        last_seen_at = MAX(last_seen_at, ?11),
                        updated_at = MAX(updated_at, ?11)
                     WHERE id = ?1",
                )
                .map_err(sql_err)?;
            stmt.execute(params![
                candidate.id,
                candidate.address,
                candidate.phone,
                candidate.email,
                candidate.website,
                candidate.rating,
                candidate.review_count.map(|c| c as i64),
                to_json(&dirs)?,
                to_json(&geos)?,
                to_json(&tags)?,
                now,
            ])
            .map_err(sql_err)?;
            Ok(false)
        }
    }
}

/// The predecessor status set a stage selects from. Stages that do not
/// select by forward status (collect, cooldown, refresh) have an empty set.
pub fn predecessor_statuses(stage: StageName) -> &'static [LeadStatus] {
    match stage {
        StageName::Filter => &[LeadStatus::Collected],
        StageName::Enrich => &[LeadStatus::Filtered],
        StageName::Score => &[LeadStatus::Enriched],
        StageName::Output => &[LeadStatus::Scored],
        StageName::Collect | StageName::Cooldown | StageName::Refresh => &[],
    }
}

/// Stage-scoped selection: leads whose status is in the stage's
/// predecessor set, excluding excluded leads (regardless of status) and
/// leads inside an active cooldown window. Stable order, optional limit.
pub fn select_for_stage(
    conn: &Connection,
    stage: StageName,
    now: i64,
    limit: Option<u32>,
) -> Result<Vec<Lead>, StorageError> {
    let statuses = predecessor_statuses(stage);
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = statuses
        .iter()
        .enumerate()
        .map(|(i, _)| format!("?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let now_idx = statuses.len() + 1;
    let limit_idx = statuses.len() + 2;
    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads
         WHERE status IN ({placeholders})
           AND excluded_reason IS NULL
           AND (cooldown_until IS NULL OR cooldown_until <= ?{now_idx})
         ORDER BY created_at ASC, id ASC
         LIMIT ?{limit_idx}"
    );

    let mut stmt = conn.prepare_cached(&sql).map_err(sql_err)?;
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = statuses
        .iter()
        .map(|s| Box::new(s.as_str()) as Box<dyn rusqlite::ToSql>)
        .collect();
    values.push(Box::new(now));
    values.push(Box::new(limit.map(i64::from).unwrap_or(i64::MAX)));

    let rows = stmt
        .query_map(rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())), map_lead)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Leads whose cooldown window has expired: candidates for re-entry.
pub fn select_expired_cooldown(
    conn: &Connection,
    now: i64,
    limit: Option<u32>,
) -> Result<Vec<Lead>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads
             WHERE status = 'cooldown'
               AND cooldown_until IS NOT NULL AND cooldown_until <= ?1
               AND excluded_reason IS NULL
             ORDER BY created_at ASC, id ASC
             LIMIT ?2"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(
            params![now, limit.map(i64::from).unwrap_or(i64::MAX)],
            map_lead,
        )
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Output/cooldown leads not updated since `cutoff`: candidates for the
/// signal-change sweep.
pub fn select_stale(
    conn: &Connection,
    cutoff: i64,
    limit: Option<u32>,
) -> Result<Vec<Lead>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads
             WHERE status IN ('output', 'cooldown')
               AND updated_at < ?1
               AND excluded_reason IS NULL
             ORDER BY created_at ASC, id ASC
             LIMIT ?2"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(
            params![cutoff, limit.map(i64::from).unwrap_or(i64::MAX)],
            map_lead,
        )
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Advance (or otherwise move) a lead's status.
pub fn set_status(
    conn: &Connection,
    id: &str,
    status: LeadStatus,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET status = ?2, updated_at = MAX(updated_at, ?3) WHERE id = ?1",
        params![id, status.as_str(), now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Persist a scoring result: score, reason tokens, and the surviving
/// active angle set.
pub fn set_score(
    conn: &Connection,
    id: &str,
    score: u32,
    reasons: &[String],
    active_angles: &[AngleType],
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET score = ?2, score_reasons = ?3, active_angles = ?4,
            status = 'scored', updated_at = MAX(updated_at, ?5)
         WHERE id = ?1",
        params![
            id,
            score as i64,
            to_json(&reasons)?,
            to_json(&active_angles)?,
            now
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Exclude a lead permanently (until explicitly refreshed).
pub fn set_exclusion(
    conn: &Connection,
    id: &str,
    reason: &str,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET excluded_reason = ?2, status = 'excluded',
            updated_at = MAX(updated_at, ?3)
         WHERE id = ?1",
        params![id, reason, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Place a lead into cooldown until the given deadline.
pub fn set_cooldown(
    conn: &Connection,
    id: &str,
    until: i64,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET cooldown_until = ?2, status = 'cooldown',
            updated_at = MAX(updated_at, ?3)
         WHERE id = ?1",
        params![id, until, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Set the post-export cooldown deadline without leaving the `output`
/// status; exported leads re-enter via the staleness sweep.
pub fn set_export_cooldown(
    conn: &Connection,
    id: &str,
    until: i64,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET cooldown_until = ?2, status = 'output',
            updated_at = MAX(updated_at, ?3)
         WHERE id = ?1",
        params![id, until, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Re-enter a lead from cooldown: clear the deadline, set the resume
/// status, and optionally clear the exhausted-angle set so angles can be
/// re-tried.
pub fn reenter_from_cooldown(
    conn: &Connection,
    id: &str,
    resume: LeadStatus,
    clear_exhausted: bool,
    now: i64,
) -> Result<(), StorageError> {
    if clear_exhausted {
        conn.execute(
            "UPDATE leads SET cooldown_until = NULL, status = ?2,
                exhausted_angles = '[]', updated_at = MAX(updated_at, ?3)
             WHERE id = ?1",
            params![id, resume.as_str(), now],
        )
        .map_err(sql_err)?;
    } else {
        conn.execute(
            "UPDATE leads SET cooldown_until = NULL, status = ?2,
                updated_at = MAX(updated_at, ?3)
             WHERE id = ?1",
            params![id, resume.as_str(), now],
        )
        .map_err(sql_err)?;
    }
    Ok(())
}

/// Persist an enrichment payload and advance to `enriched`.
pub fn set_enrichment(
    conn: &Connection,
    id: &str,
    enrichment: &EnrichmentData,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET enrichment = ?2, status = 'enriched',
            updated_at = MAX(updated_at, ?3)
         WHERE id = ?1",
        params![id, to_json(enrichment)?, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Record a contact attempt outcome.
pub fn record_contact(
    conn: &Connection,
    id: &str,
    result: &str,
    now: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET last_contact_at = ?3, last_contact_result = ?2,
            updated_at = MAX(updated_at, ?3)
         WHERE id = ?1",
        params![id, result, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Move an angle from the active set into the exhausted set.
pub fn exhaust_angle(
    conn: &Connection,
    id: &str,
    angle: AngleType,
    now: i64,
) -> Result<(), StorageError> {
    let lead = get(conn, id)?.ok_or_else(|| StorageError::LeadNotFound {
        id: id.to_string(),
    })?;
    let active: Vec<AngleType> = lead
        .active_angles
        .iter()
        .copied()
        .filter(|a| *a != angle)
        .collect();
    let mut exhausted = lead.exhausted_angles.clone();
    if !exhausted.contains(&angle) {
        exhausted.push(angle);
    }
    conn.execute(
        "UPDATE leads SET active_angles = ?2, exhausted_angles = ?3,
            updated_at = MAX(updated_at, ?4)
         WHERE id = ?1",
        params![id, to_json(&active)?, to_json(&exhausted)?, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Bump `updated_at` only — used by the signal sweep to defer re-checks.
pub fn touch(conn: &Connection, id: &str, now: i64) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE leads SET updated_at = MAX(updated_at, ?2) WHERE id = ?1",
        params![id, now],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Lead counts grouped by status, for pipeline introspection.
pub fn counts_by_status(conn: &Connection) -> Result<Vec<(String, u64)>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT status, COUNT(*) FROM leads GROUP BY status ORDER BY status")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
