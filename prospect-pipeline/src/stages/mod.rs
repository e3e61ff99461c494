//! The seven pipeline stages and their shared runner skeleton.

pub mod collect;
pub mod cooldown;
pub mod enrich;
pub mod filter;
pub mod output;
pub mod refresh;
pub mod runner;
pub mod score;

use prospect_core::types::{RunStatus, StageName};

/// The outcome of one stage run, mirrored from the run row.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: StageName,
    pub run_id: i64,
    pub status: RunStatus,
    pub processed: u64,
    pub passed: u64,
    pub failed: u64,
}
