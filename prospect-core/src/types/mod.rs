//! Core data model: leads, runs, raw discoveries, enrichment.

pub mod discovery;
pub mod enrichment;
pub mod lead;
pub mod run;

pub use discovery::{RawBusinessData, RawDiscovery};
pub use enrichment::{EnrichmentData, EnrichmentFailure, FetchFailure};
pub use lead::{AngleType, Lead, LeadStatus};
pub use run::{Run, RunStatus, StageName};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as epoch milliseconds.
///
/// All persisted timestamps use this representation; the store clamps
/// every `updated_at` write to `MAX(updated_at, now)` so timestamps never
/// move backwards even across clock adjustments.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
