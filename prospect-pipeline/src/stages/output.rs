//! Output stage: export scored leads and start their post-export cooldown.
//!
//! The writer owns serialization; the stage's obligations toward the
//! store are marking the lead `output` and setting the cooldown deadline.
//! A broken sink is a run-level failure, not a per-record one.

use prospect_core::config::CooldownConfig;
use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, StageName};
use prospect_storage::queries::leads;

use super::runner;
use super::StageSummary;
use crate::context::RunContext;
use crate::output::{project, OutputWriter, DEFAULT_FIELDS};

pub fn run(
    ctx: &RunContext,
    writer: &mut dyn OutputWriter,
    field_paths: Option<&[&str]>,
) -> Result<StageSummary, PipelineError> {
    let fields = field_paths.unwrap_or(DEFAULT_FIELDS);
    runner::execute(ctx, StageName::Output, |run| {
        let now = now_ms();
        let batch = ctx.db.with_reader(|c| {
            leads::select_for_stage(c, StageName::Output, now, ctx.selection_limit())
        })?;

        for lead in batch {
            run.check_cancelled()?;
            let now = now_ms();

            let record = project(&lead, fields);
            writer
                .write_record(&record)
                .map_err(|e| PipelineError::Output(e.to_string()))?;

            let days = ctx.config.cooldown.effective_post_export_days();
            let until = CooldownConfig::deadline(now, days);
            ctx.db
                .with_writer(|c| leads::set_export_cooldown(c, &lead.id, until, now))?;
            run.record_pass()?;
        }

        writer
            .flush()
            .map_err(|e| PipelineError::Output(e.to_string()))
    })
}
