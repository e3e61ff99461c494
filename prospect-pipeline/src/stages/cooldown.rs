//! Cooldown stage: the expired-cooldown sweep.

use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, StageName};
use prospect_storage::queries::leads;

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::cooldown::{clear_exhausted_on_resume, resume_status};

pub fn run(ctx: &RunContext) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Cooldown, |run| {
        if !ctx.config.refresh.effective_expired_sweep() {
            tracing::debug!("expired-cooldown sweep disabled");
            return Ok(());
        }

        let now = now_ms();
        let due = ctx
            .db
            .with_reader(|c| leads::select_expired_cooldown(c, now, ctx.selection_limit()))?;
        let clear_exhausted = clear_exhausted_on_resume(&ctx.config.refresh);

        for lead in due {
            run.check_cancelled()?;
            let resume = resume_status(&lead);
            ctx.db.with_writer(|c| {
                leads::reenter_from_cooldown(c, &lead.id, resume, clear_exhausted, now_ms())
            })?;
            tracing::debug!(
                lead_id = lead.id.as_str(),
                resume = resume.as_str(),
                "cooldown expired, re-entering"
            );
            run.record_pass()?;
        }
        Ok(())
    })
}
