//! Enrich stage: fetch web-presence signals for filtered leads.
//!
//! Leads without a website have nothing to fetch and advance directly.
//! Fetch failures are per-record: logged against the lead, counted, and
//! answered with the per-failure cooldown policy.

use prospect_core::config::CooldownConfig;
use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, LeadStatus, StageName};
use prospect_storage::queries::{enrichment_failures, leads};

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::enrich::Enricher;
use crate::limiter::RateLimiter;

pub fn run(
    ctx: &RunContext,
    enricher: Option<&dyn Enricher>,
    limiter: &RateLimiter,
) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Enrich, |run| {
        let now = now_ms();
        let batch = ctx.db.with_reader(|c| {
            leads::select_for_stage(c, StageName::Enrich, now, ctx.selection_limit())
        })?;

        for lead in batch {
            run.check_cancelled()?;
            let now = now_ms();

            let Some(enricher) = enricher else {
                ctx.db
                    .with_writer(|c| leads::set_status(c, &lead.id, LeadStatus::Enriched, now))?;
                run.record_pass()?;
                continue;
            };

            if lead.website.is_none() {
                ctx.db
                    .with_writer(|c| leads::set_status(c, &lead.id, LeadStatus::Enriched, now))?;
                run.record_pass()?;
                continue;
            }

            limiter.acquire();
            match enricher.enrich(&lead) {
                Ok(data) => {
                    ctx.db
                        .with_writer(|c| leads::set_enrichment(c, &lead.id, &data, now))?;
                    run.record_pass()?;
                }
                Err(failure) => {
                    let days = ctx.config.cooldown.days_for_failure(failure.kind);
                    let until = CooldownConfig::deadline(now, days);
                    ctx.db.with_transaction(|c| {
                        enrichment_failures::insert(
                            c,
                            &lead.id,
                            failure.url.as_deref(),
                            failure.kind,
                            failure.message.as_deref(),
                            now,
                        )?;
                        leads::set_cooldown(c, &lead.id, until, now)
                    })?;
                    run.record_fail(&lead.id, failure.kind.as_str())?;
                }
            }
        }
        Ok(())
    })
}
