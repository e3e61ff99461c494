//! The control-flow skeleton shared by all stages.
//!
//! A stage run claims a run row, processes its selected leads one at a
//! time, and flushes counter deltas to the store after every record, so
//! progress queries see live counters, not just the final tally. Each
//! lead's state change is committed independently; cancellation or a
//! run-level failure freezes the counters where they are and never rolls
//! a lead back.

use prospect_core::errors::{ErrorCode, PipelineError};
use prospect_core::traits::Cancellable;
use prospect_core::types::{now_ms, RunStatus, StageName};
use prospect_storage::queries::runs;

use super::StageSummary;
use crate::context::RunContext;

/// Live state of one stage run.
pub struct StageRun<'a> {
    ctx: &'a RunContext,
    stage: StageName,
    run_id: i64,
    processed: u64,
    passed: u64,
    failed: u64,
}

impl<'a> StageRun<'a> {
    fn start(ctx: &'a RunContext, stage: StageName) -> Result<Self, PipelineError> {
        let run_id = ctx
            .db
            .with_writer(|c| runs::insert_start(c, stage, now_ms()))?;
        tracing::info!(stage = stage.as_str(), run_id, "stage run started");
        Ok(Self {
            ctx,
            stage,
            run_id,
            processed: 0,
            passed: 0,
            failed: 0,
        })
    }

    pub fn stage(&self) -> StageName {
        self.stage
    }

    /// Return `Err(Cancelled)` if cancellation has been requested.
    /// Stages call this between leads.
    pub fn check_cancelled(&self) -> Result<(), PipelineError> {
        if self.ctx.token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    /// A lead advanced through the stage.
    pub fn record_pass(&mut self) -> Result<(), PipelineError> {
        self.processed += 1;
        self.passed += 1;
        self.flush(1, 1, 0)
    }

    /// A lead was handled but did not advance (excluded, held, cooled).
    pub fn record_skip(&mut self) -> Result<(), PipelineError> {
        self.processed += 1;
        self.flush(1, 0, 0)
    }

    /// A per-record failure. Logged and counted; processing continues.
    pub fn record_fail(&mut self, lead_id: &str, message: &str) -> Result<(), PipelineError> {
        tracing::warn!(
            stage = self.stage.as_str(),
            lead_id,
            message,
            "record failed"
        );
        self.processed += 1;
        self.failed += 1;
        self.flush(1, 0, 1)
    }

    fn flush(&self, processed: u64, passed: u64, failed: u64) -> Result<(), PipelineError> {
        self.ctx
            .db
            .with_writer(|c| runs::add_counters(c, self.run_id, processed, passed, failed))?;
        Ok(())
    }

    fn complete(
        self,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<StageSummary, PipelineError> {
        self.ctx
            .db
            .with_writer(|c| runs::complete(c, self.run_id, now_ms(), status, error))?;
        tracing::info!(
            stage = self.stage.as_str(),
            run_id = self.run_id,
            status = status.as_str(),
            processed = self.processed,
            passed = self.passed,
            failed = self.failed,
            "stage run finished"
        );
        Ok(StageSummary {
            stage: self.stage,
            run_id: self.run_id,
            status,
            processed: self.processed,
            passed: self.passed,
            failed: self.failed,
        })
    }
}

/// Run a stage body inside the runner skeleton.
///
/// The body only sees record-level concerns; this wrapper owns the run
/// row lifecycle. A body error marks the run failed (or cancelled) with
/// counters frozen at their last checkpoint, then propagates.
pub fn execute<F>(
    ctx: &RunContext,
    stage: StageName,
    body: F,
) -> Result<StageSummary, PipelineError>
where
    F: FnOnce(&mut StageRun) -> Result<(), PipelineError>,
{
    let mut run = StageRun::start(ctx, stage)?;
    match body(&mut run) {
        Ok(()) => run.complete(RunStatus::Completed, None),
        Err(PipelineError::Cancelled) => {
            run.complete(RunStatus::Cancelled, None)?;
            Err(PipelineError::Cancelled)
        }
        Err(e) => {
            // Run rows carry the stable `[ERROR_CODE] message` form so run
            // history can be searched by code.
            let message = e.coded_string();
            run.complete(RunStatus::Failed, Some(&message))?;
            Err(e)
        }
    }
}
