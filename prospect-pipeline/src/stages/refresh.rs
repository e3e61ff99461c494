//! Refresh stage: the signal-change sweep over stale leads.

use prospect_core::config::cooldown_config::DAY_MS;
use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, LeadStatus, StageName};
use prospect_storage::queries::leads;

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::cooldown::SignalChangeCheck;

pub fn run(
    ctx: &RunContext,
    check: &dyn SignalChangeCheck,
) -> Result<StageSummary, PipelineError> {
    runner::execute(ctx, StageName::Refresh, |run| {
        if !ctx.config.refresh.effective_signal_sweep() {
            tracing::debug!("signal-change sweep disabled");
            return Ok(());
        }

        let now = now_ms();
        let cutoff = now - i64::from(ctx.config.refresh.effective_staleness_days()) * DAY_MS;
        let stale = ctx
            .db
            .with_reader(|c| leads::select_stale(c, cutoff, ctx.selection_limit()))?;

        for lead in stale {
            run.check_cancelled()?;
            if check.signal_changed(&lead) {
                // A changed signal re-enters at `filtered` for re-scoring.
                ctx.db.with_writer(|c| {
                    leads::reenter_from_cooldown(c, &lead.id, LeadStatus::Filtered, false, now_ms())
                })?;
                tracing::debug!(lead_id = lead.id.as_str(), "signal changed, re-entering");
                run.record_pass()?;
            } else {
                // Touch the timestamp so the lead is not re-checked until
                // the next staleness window.
                ctx.db.with_writer(|c| leads::touch(c, &lead.id, now_ms()))?;
                run.record_skip()?;
            }
        }
        Ok(())
    })
}
