//! Enrichment seam: the pluggable fetcher trait.
//!
//! The core never sees page content. A fetcher returns either a typed
//! [`EnrichmentData`] payload or a failure drawn from the fixed
//! [`FetchFailure`] taxonomy; the stage records the failure and applies
//! the per-failure cooldown policy.

use prospect_core::types::{EnrichmentData, FetchFailure, Lead};

/// A failed enrichment fetch. Only the taxonomy tag drives policy; the
/// message is for the failure log.
#[derive(Debug, Clone)]
pub struct EnrichFailure {
    pub kind: FetchFailure,
    pub url: Option<String>,
    pub message: Option<String>,
}

/// Pluggable enrichment fetcher. Implementations own all transport and
/// extraction concerns.
pub trait Enricher: Send + Sync {
    fn enrich(&self, lead: &Lead) -> Result<EnrichmentData, EnrichFailure>;
}
