//! Integration tests for lead upsert and partial-update queries.

use prospect_core::identity::{canonicalize, identity_key};
use prospect_core::types::{AngleType, EnrichmentData, Lead, LeadStatus};
use prospect_storage::queries::leads;
use prospect_storage::DatabaseManager;

fn sample_lead(name: &str, city: &str, now: i64) -> Lead {
    let canonical = canonicalize(name);
    let id = identity_key(&canonical, Some(city), Some("tx"), None);
    Lead {
        id,
        name: name.to_string(),
        canonical_name: canonical,
        address: None,
        city: Some(city.to_string()),
        region: Some("tx".to_string()),
        country: None,
        phone: None,
        email: None,
        website: None,
        status: LeadStatus::New,
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
        first_seen_at: now,
        last_seen_at: now,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn upsert_is_idempotent_by_identity_key() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("Pro Plumbing LLC", "austin", 1_000);

    let inserted = db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();
    assert!(inserted);

    // Same business, different raw spelling: same identity key.
    let mut again = sample_lead("pro plumbing", "austin", 2_000);
    assert_eq!(again.id, lead.id);
    again.phone = Some("512-555-0100".to_string());

    let inserted = db.with_writer(|c| leads::upsert(c, &again, 2_000)).unwrap();
    assert!(!inserted);

    let stored = db
        .with_reader(|c| leads::get(c, &lead.id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.phone.as_deref(), Some("512-555-0100"));
    // Original display name is kept; only missing fields were filled.
    assert_eq!(stored.name, "Pro Plumbing LLC");
    assert_eq!(stored.first_seen_at, 1_000);
    assert_eq!(stored.last_seen_at, 2_000);

    let count: u64 = db
        .with_reader(|c| leads::counts_by_status(c))
        .unwrap()
        .iter()
        .map(|(_, n)| n)
        .sum();
    assert_eq!(count, 1);
}

#[test]
fn merge_never_overwrites_existing_contact_fields() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut lead = sample_lead("Acme Electric", "dallas", 1_000);
    lead.email = Some("info@acme.example".to_string());
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    let mut again = lead.clone();
    again.email = Some("other@acme.example".to_string());
    again.website = Some("https://acme.example".to_string());
    db.with_writer(|c| leads::upsert(c, &again, 2_000)).unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some("info@acme.example"));
    assert_eq!(stored.website.as_deref(), Some("https://acme.example"));
}

#[test]
fn merge_preserves_pipeline_progress() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("Tidy Cleaning", "waco", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();
    db.with_writer(|c| {
        leads::set_score(
            c,
            &lead.id,
            55,
            &["no_website:+20".to_string()],
            &[AngleType::NoWebsite],
            1_500,
        )
    })
    .unwrap();

    // Re-discovery must not reset status, score, or angles.
    db.with_writer(|c| leads::upsert(c, &lead, 2_000)).unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::Scored);
    assert_eq!(stored.score, Some(55));
    assert_eq!(stored.active_angles, vec![AngleType::NoWebsite]);
}

#[test]
fn merge_unions_source_metadata() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut lead = sample_lead("Bayside Dental", "houston", 1_000);
    lead.source_directories = vec!["dir-a".to_string()];
    lead.source_geos = vec!["houston".to_string()];
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    let mut again = lead.clone();
    again.source_directories = vec!["dir-a".to_string(), "dir-b".to_string()];
    again.source_tags = vec!["dental".to_string()];
    db.with_writer(|c| leads::upsert(c, &again, 2_000)).unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.source_directories, vec!["dir-a", "dir-b"]);
    assert_eq!(stored.source_geos, vec!["houston"]);
    assert_eq!(stored.source_tags, vec!["dental"]);
}

#[test]
fn updated_at_never_moves_backwards() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("Summit Roofing", "lubbock", 5_000);
    db.with_writer(|c| leads::upsert(c, &lead, 5_000)).unwrap();

    // A write stamped with an earlier clock must not rewind the timestamp.
    db.with_writer(|c| leads::set_status(c, &lead.id, LeadStatus::Collected, 3_000))
        .unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::Collected);
    assert_eq!(stored.updated_at, 5_000);
}

#[test]
fn exhaust_angle_moves_between_disjoint_sets() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("Lakeside Vet", "austin", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();
    db.with_writer(|c| {
        leads::set_score(
            c,
            &lead.id,
            60,
            &[],
            &[AngleType::NoWebsite, AngleType::LowReviews],
            1_500,
        )
    })
    .unwrap();

    db.with_writer(|c| leads::exhaust_angle(c, &lead.id, AngleType::NoWebsite, 2_000))
        .unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.active_angles, vec![AngleType::LowReviews]);
    assert_eq!(stored.exhausted_angles, vec![AngleType::NoWebsite]);

    // Exhausting again is a no-op on the exhausted set.
    db.with_writer(|c| leads::exhaust_angle(c, &lead.id, AngleType::NoWebsite, 2_500))
        .unwrap();
    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.exhausted_angles, vec![AngleType::NoWebsite]);
}

#[test]
fn enrichment_round_trips_and_advances_status() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("Hilltop Bakery", "el paso", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    let enrichment = EnrichmentData {
        emails: vec!["hello@hilltop.example".to_string()],
        phones: Vec::new(),
        social_links: vec!["https://instagram.com/hilltop".to_string()],
        has_online_booking: false,
        last_updated_at: Some(900),
        founder_profile: true,
        employee_count: Some(3),
    };
    db.with_writer(|c| leads::set_enrichment(c, &lead.id, &enrichment, 2_000))
        .unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::Enriched);
    let e = stored.enrichment.clone().unwrap();
    assert_eq!(e.emails, vec!["hello@hilltop.example"]);
    assert!(e.founder_profile);
    assert!(stored.has_contact_info());
}

#[test]
fn record_contact_updates_history_only() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let lead = sample_lead("North Fence Co", "plano", 1_000);
    db.with_writer(|c| leads::upsert(c, &lead, 1_000)).unwrap();

    db.with_writer(|c| leads::record_contact(c, &lead.id, "replied", 3_000))
        .unwrap();

    let stored = db.with_reader(|c| leads::get(c, &lead.id)).unwrap().unwrap();
    assert_eq!(stored.last_contact_at, Some(3_000));
    assert_eq!(stored.last_contact_result.as_deref(), Some("replied"));
    assert_eq!(stored.status, LeadStatus::New);
}
