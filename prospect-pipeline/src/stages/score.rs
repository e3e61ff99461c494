//! Score stage: run the scoring engine and route leads by its decision.
//!
//! The score and its reasons are persisted on every outcome so an
//! excluded or cooled lead still shows why it landed there.

use prospect_core::config::CooldownConfig;
use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, StageName};
use prospect_storage::queries::leads;

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::scoring::{decide, score_lead, ScoreDecision};

pub fn run(ctx: &RunContext) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Score, |run| {
        let now = now_ms();
        let batch = ctx.db.with_reader(|c| {
            leads::select_for_stage(c, StageName::Score, now, ctx.selection_limit())
        })?;

        for lead in batch {
            run.check_cancelled()?;
            let now = now_ms();
            let breakdown = score_lead(&lead, &ctx.config.scoring, now);

            match decide(&breakdown, &ctx.config.scoring) {
                ScoreDecision::Advance => {
                    ctx.db.with_writer(|c| {
                        leads::set_score(
                            c,
                            &lead.id,
                            breakdown.score,
                            &breakdown.reasons,
                            &breakdown.active_angles,
                            now,
                        )
                    })?;
                    run.record_pass()?;
                }
                ScoreDecision::ExcludeBadFit => {
                    ctx.db.with_transaction(|c| {
                        leads::set_score(
                            c,
                            &lead.id,
                            breakdown.score,
                            &breakdown.reasons,
                            &breakdown.active_angles,
                            now,
                        )?;
                        leads::set_exclusion(c, &lead.id, "bad_fit", now)
                    })?;
                    tracing::debug!(
                        lead_id = lead.id.as_str(),
                        score = breakdown.score,
                        "excluded as bad_fit"
                    );
                    run.record_skip()?;
                }
                ScoreDecision::CooldownNoAngles => {
                    let days = ctx.config.cooldown.effective_no_angles_days();
                    let until = CooldownConfig::deadline(now, days);
                    ctx.db.with_transaction(|c| {
                        leads::set_score(
                            c,
                            &lead.id,
                            breakdown.score,
                            &breakdown.reasons,
                            &breakdown.active_angles,
                            now,
                        )?;
                        leads::set_cooldown(c, &lead.id, until, now)
                    })?;
                    tracing::debug!(
                        lead_id = lead.id.as_str(),
                        "all angles exhausted, cooling down"
                    );
                    run.record_skip()?;
                }
            }
        }
        Ok(())
    })
}
