//! Integration tests for stage-scoped lead selection.

use prospect_core::identity::{canonicalize, identity_key};
use prospect_core::types::{Lead, LeadStatus, StageName};
use prospect_storage::queries::leads;
use prospect_storage::DatabaseManager;

fn lead_at(name: &str, created_at: i64) -> Lead {
    let canonical = canonicalize(name);
    let id = identity_key(&canonical, Some("austin"), Some("tx"), None);
    Lead {
        id,
        name: name.to_string(),
        canonical_name: canonical,
        address: None,
        city: Some("austin".to_string()),
        region: Some("tx".to_string()),
        country: None,
        phone: None,
        email: None,
        website: None,
        status: LeadStatus::Collected,
        score: None,
        score_reasons: Vec::new(),
        active_angles: Vec::new(),
        exhausted_angles: Vec::new(),
        excluded_reason: None,
        cooldown_until: None,
        last_contact_at: None,
        last_contact_result: None,
        source_directories: Vec::new(),
        source_geos: Vec::new(),
        source_tags: Vec::new(),
        enrichment: None,
        rating: None,
        review_count: None,
        first_seen_at: created_at,
        last_seen_at: created_at,
        created_at,
        updated_at: created_at,
    }
}

#[test]
fn filter_stage_sees_only_collected_leads() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let collected = lead_at("Collected Co", 1_000);
    let mut enriched = lead_at("Enriched Co", 1_000);
    enriched.status = LeadStatus::Enriched;

    db.with_writer(|c| {
        leads::upsert(c, &collected, 1_000)?;
        leads::upsert(c, &enriched, 1_000)
    })
    .unwrap();

    let selected = db
        .with_reader(|c| leads::select_for_stage(c, StageName::Filter, 5_000, None))
        .unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, collected.id);
}

#[test]
fn excluded_leads_are_invisible_to_every_stage() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = lead_at("Shut Down Plumbing", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();
    db.with_writer(|c| leads::set_exclusion(c, &lead.id, "out_of_business", 2_000))
        .unwrap();

    for stage in [StageName::Filter, StageName::Enrich, StageName::Score, StageName::Output] {
        let selected = db
            .with_reader(|c| leads::select_for_stage(c, stage, 5_000, None))
            .unwrap();
        assert!(selected.is_empty(), "{stage:?} must not see excluded lead");
    }
}

#[test]
fn active_cooldown_holds_a_lead_expired_releases_it() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut lead = lead_at("Cooling Off HVAC", 1_000);
    lead.cooldown_until = Some(10_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    let held = db
        .with_reader(|c| leads::select_for_stage(c, StageName::Filter, 5_000, None))
        .unwrap();
    assert!(held.is_empty());

    let released = db
        .with_reader(|c| leads::select_for_stage(c, StageName::Filter, 10_000, None))
        .unwrap();
    assert_eq!(released.len(), 1);
}

#[test]
fn selection_order_is_stable_and_limited() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let older = lead_at("Older Lead", 1_000);
    let newer = lead_at("Newer Lead", 2_000);
    // Two leads sharing a created_at tie-break on id.
    let tie_a = lead_at("Tie Alpha", 3_000);
    let tie_b = lead_at("Tie Beta", 3_000);

    db.with_writer(|c| {
        for l in [&newer, &tie_b, &older, &tie_a] {
            leads::upsert(c, l, 3_000)?;
        }
        Ok(())
    })
    .unwrap();

    let all = db
        .with_reader(|c| leads::select_for_stage(c, StageName::Filter, 5_000, None))
        .unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].id, older.id);
    assert_eq!(all[1].id, newer.id);
    let (low, high) = if tie_a.id < tie_b.id {
        (tie_a.id.clone(), tie_b.id.clone())
    } else {
        (tie_b.id.clone(), tie_a.id.clone())
    };
    assert_eq!(all[2].id, low);
    assert_eq!(all[3].id, high);

    // A limited pass takes the head of the same ordering.
    let limited = db
        .with_reader(|c| leads::select_for_stage(c, StageName::Filter, 5_000, Some(2)))
        .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, older.id);
    assert_eq!(limited[1].id, newer.id);
}

#[test]
fn expired_cooldown_selection_skips_active_windows() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let expired = lead_at("Ready Again", 1_000);
    let active = lead_at("Still Waiting", 1_000);
    db.with_writer(|c| {
        leads::upsert(c, &expired, 1_000)?;
        leads::upsert(c, &active, 1_000)
    })
    .unwrap();
    db.with_writer(|c| {
        leads::set_cooldown(c, &expired.id, 4_000, 1_500)?;
        leads::set_cooldown(c, &active.id, 9_000, 1_500)
    })
    .unwrap();

    let due = db
        .with_reader(|c| leads::select_expired_cooldown(c, 5_000, None))
        .unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, expired.id);
}

#[test]
fn stale_selection_covers_output_and_cooldown() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let stale_out = lead_at("Stale Output", 1_000);
    let fresh_out = lead_at("Fresh Output", 1_000);
    db.with_writer(|c| {
        leads::upsert(c, &stale_out, 1_000)?;
        leads::upsert(c, &fresh_out, 1_000)
    })
    .unwrap();
    db.with_writer(|c| {
        leads::set_status(c, &stale_out.id, LeadStatus::Output, 2_000)?;
        leads::set_status(c, &fresh_out.id, LeadStatus::Output, 8_000)
    })
    .unwrap();

    let stale = db
        .with_reader(|c| leads::select_stale(c, 5_000, None))
        .unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id, stale_out.id);
}

#[test]
fn collect_stage_has_no_status_driven_selection() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = lead_at("Any Lead", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    for stage in [StageName::Collect, StageName::Cooldown, StageName::Refresh] {
        let selected = db
            .with_reader(|c| leads::select_for_stage(c, stage, 5_000, None))
            .unwrap();
        assert!(selected.is_empty());
    }
}
