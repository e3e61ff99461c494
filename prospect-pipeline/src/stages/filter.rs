//! Filter stage: apply the rule evaluator to collected leads.

use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, LeadStatus, StageName};
use prospect_storage::queries::leads;

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::filter::{evaluate, FilterDecision};

pub fn run(ctx: &RunContext) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Filter, |run| {
        let now = now_ms();
        let batch = ctx.db.with_reader(|c| {
            leads::select_for_stage(c, StageName::Filter, now, ctx.selection_limit())
        })?;

        for lead in batch {
            run.check_cancelled()?;
            match evaluate(&lead, &ctx.config.filter, now) {
                FilterDecision::Exclude(reason) => {
                    ctx.db
                        .with_writer(|c| leads::set_exclusion(c, &lead.id, &reason, now))?;
                    tracing::debug!(lead_id = lead.id.as_str(), reason = %reason, "lead excluded");
                    run.record_skip()?;
                }
                FilterDecision::Hold => {
                    run.record_skip()?;
                }
                FilterDecision::Pass => {
                    ctx.db.with_writer(|c| {
                        leads::set_status(c, &lead.id, LeadStatus::Filtered, now)
                    })?;
                    run.record_pass()?;
                }
            }
        }
        Ok(())
    })
}
