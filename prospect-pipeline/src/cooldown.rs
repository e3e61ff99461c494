//! Cooldown & refresh controller decisions.
//!
//! Two independent sweeps, each toggleable in [`RefreshConfig`]:
//! the expired-cooldown sweep re-enters leads whose window has passed,
//! and the signal-change sweep re-checks stale output/cooldown leads
//! through a pluggable change-detection hook.

use prospect_core::config::RefreshConfig;
use prospect_core::types::{Lead, LeadStatus};

/// Pluggable signal-change check for the staleness sweep.
///
/// The controller only requires a boolean per lead; how the answer is
/// produced (website diffing, review-count polling, a manual list) is the
/// implementor's business.
pub trait SignalChangeCheck {
    fn signal_changed(&self, lead: &Lead) -> bool;
}

/// The default check: always reports "no change". Stale leads get their
/// timestamp touched and are re-examined after the next staleness window.
pub struct NoSignalChange;

impl SignalChangeCheck for NoSignalChange {
    fn signal_changed(&self, _lead: &Lead) -> bool {
        false
    }
}

/// Where an expired-cooldown lead resumes. Leads that retain enrichment
/// data or a prior score skip re-collection and re-filtering; the rest
/// start over from `collected`.
pub fn resume_status(lead: &Lead) -> LeadStatus {
    if lead.has_prior_progress() {
        LeadStatus::Enriched
    } else {
        LeadStatus::Collected
    }
}

/// Whether the expired sweep should also clear the exhausted-angle set.
pub fn clear_exhausted_on_resume(config: &RefreshConfig) -> bool {
    config.effective_retry_exhausted_angles()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_core::types::EnrichmentData;

    fn cooled_lead() -> Lead {
        Lead {
            id: "id".to_string(),
            name: "Acme".to_string(),
            canonical_name: "acme".to_string(),
            address: None,
            city: None,
            region: None,
            country: None,
            phone: None,
            email: None,
            website: None,
            status: LeadStatus::Cooldown,
            score: None,
            score_reasons: Vec::new(),
            active_angles: Vec::new(),
            exhausted_angles: Vec::new(),
            excluded_reason: None,
            cooldown_until: Some(1_000),
            last_contact_at: None,
            last_contact_result: None,
            source_directories: Vec::new(),
            source_geos: Vec::new(),
            source_tags: Vec::new(),
            enrichment: None,
            rating: None,
            review_count: None,
            first_seen_at: 0,
            last_seen_at: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn lead_with_enrichment_resumes_at_enriched() {
        let mut lead = cooled_lead();
        lead.enrichment = Some(EnrichmentData {
            emails: vec!["a@b.example".to_string()],
            ..Default::default()
        });
        assert_eq!(resume_status(&lead), LeadStatus::Enriched);
    }

    #[test]
    fn lead_with_prior_score_resumes_at_enriched() {
        let mut lead = cooled_lead();
        lead.score = Some(55);
        assert_eq!(resume_status(&lead), LeadStatus::Enriched);
    }

    #[test]
    fn bare_lead_resumes_at_collected() {
        assert_eq!(resume_status(&cooled_lead()), LeadStatus::Collected);
    }

    #[test]
    fn empty_enrichment_payload_is_not_progress() {
        let mut lead = cooled_lead();
        lead.enrichment = Some(EnrichmentData::default());
        assert_eq!(resume_status(&lead), LeadStatus::Collected);
    }

    #[test]
    fn default_signal_check_reports_no_change() {
        assert!(!NoSignalChange.signal_changed(&cooled_lead()));
    }
}
