//! Collect stage: pull raw records from configured sources into the
//! staging queue, then drain the queue into leads by identity key.
//!
//! Draining also picks up staged records left behind by earlier
//! interrupted runs, so a crash between staging and upsert loses nothing.

use prospect_core::errors::PipelineError;
use prospect_core::identity::{canonicalize, identity_key};
use prospect_core::types::{now_ms, Lead, LeadStatus, RawBusinessData, StageName};
use prospect_storage::queries::{leads, raw_discoveries};

use super::runner::{self, StageRun};
use super::StageSummary;
use crate::context::RunContext;
use crate::limiter::RateLimiterSet;
use crate::sources::SourceRegistry;

pub fn run(ctx: &RunContext, registry: &SourceRegistry) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Collect, |run| {
        let limiters = RateLimiterSet::from_configs(&ctx.config.sources);
        stage_sources(ctx, registry, &limiters, run)?;
        drain_staging(ctx, run)
    })
}

/// Ask every configured source for records and stage them. A source that
/// fails to produce is counted failed and skipped; the rest still run.
/// Each source discovers under its own configured request budget.
fn stage_sources(
    ctx: &RunContext,
    registry: &SourceRegistry,
    limiters: &RateLimiterSet,
    run: &mut StageRun,
) -> Result<(), PipelineError> {
    for source_config in &ctx.config.sources {
        run.check_cancelled()?;
        let source = match registry.get(&source_config.source_type) {
            Ok(s) => s,
            Err(e) => {
                run.record_fail(&source_config.source_type, &e.to_string())?;
                continue;
            }
        };
        let limiter = limiters.limiter_for(&source_config.source_type);
        let records = match source.discover(source_config, limiter) {
            Ok(r) => r,
            Err(e) => {
                run.record_fail(&source_config.source_type, &e.to_string())?;
                continue;
            }
        };
        tracing::debug!(
            source = source_config.source_type.as_str(),
            count = records.len(),
            "staged raw records"
        );
        let now = now_ms();
        for mut record in records {
            if record.geo.is_none() {
                record.geo = source_config.geo.clone();
            }
            for tag in &source_config.tags {
                if !record.tags.contains(tag) {
                    record.tags.push(tag.clone());
                }
            }
            ctx.db.with_writer(|c| {
                raw_discoveries::insert(c, None, &source_config.source_type, &record, now)
            })?;
        }
    }
    Ok(())
}

/// Drain unprocessed staging records into leads.
fn drain_staging(ctx: &RunContext, run: &mut StageRun) -> Result<(), PipelineError> {
    let pending = ctx.db.with_reader(|c| raw_discoveries::unprocessed(c, None))?;

    for discovery in pending {
        run.check_cancelled()?;

        if discovery.data.name.trim().is_empty() {
            ctx.db
                .with_writer(|c| raw_discoveries::mark_processed(c, discovery.id))?;
            run.record_fail(&discovery.source, "record has no business name")?;
            continue;
        }

        let now = now_ms();
        let candidate = lead_from_raw(&discovery.data, &discovery.source, now);
        let inserted = ctx.db.with_transaction(|c| {
            let inserted = leads::upsert(c, &candidate, now)?;
            // New leads enter at `new` and advance immediately; merged
            // leads keep whatever progress they already made.
            if inserted {
                leads::set_status(c, &candidate.id, LeadStatus::Collected, now)?;
            }
            raw_discoveries::mark_processed(c, discovery.id)?;
            Ok(inserted)
        })?;

        tracing::debug!(
            lead_id = candidate.id.as_str(),
            inserted,
            "collected lead"
        );
        run.record_pass()?;
    }
    Ok(())
}

fn lead_from_raw(data: &RawBusinessData, source: &str, now: i64) -> Lead {
    let canonical_name = canonicalize(&data.name);
    let id = identity_key(
        &canonical_name,
        data.city.as_deref(),
        data.region.as_deref(),
        data.country.as_deref(),
    );
    let directory = data.directory.clone().unwrap_or_else(|| source.to_string());
    Lead {
        id,
        name: data.name.clone(),
        canonical_name,
        address: data.address.clone(),
        city: data.city.clone(),
        region: data.region.clone(),
        country: data.country.clone(),
        phone: data.phone.clone(),
        email: data.email.clone(),
        website: data.website.clone(),
        status: LeadStatus::New,
        score: None,
        score_reasons: Vec::new(),
        active_angles: Vec::new(),
        exhausted_angles: Vec::new(),
        excluded_reason: None,
        cooldown_until: None,
        last_contact_at: None,
        last_contact_result: None,
        source_directories: vec![directory],
        source_geos: data.geo.clone().into_iter().collect(),
        source_tags: data.tags.clone(),
        enrichment: None,
        rating: data.rating,
        review_count: data.review_count,
        first_seen_at: now,
        last_seen_at: now,
        created_at: now,
        updated_at: now,
    }
}
