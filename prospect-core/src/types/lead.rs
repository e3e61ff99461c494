//! The Lead entity and its status state machine.

use serde::{Deserialize, Serialize};

use super::enrichment::EnrichmentData;

/// Pipeline status of a lead.
///
/// Forward order: `new → collected → filtered → enriched → scored → output`.
/// `excluded` and `cooldown` are side states reachable from any forward
/// state. The only automatic re-entry edges are
/// `cooldown → {collected | enriched | filtered}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Collected,
    Filtered,
    Enriched,
    Scored,
    Output,
    Excluded,
    Cooldown,
}

impl LeadStatus {
    /// Stable string form used in the `leads.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Collected => "collected",
            Self::Filtered => "filtered",
            Self::Enriched => "enriched",
            Self::Scored => "scored",
            Self::Output => "output",
            Self::Excluded => "excluded",
            Self::Cooldown => "cooldown",
        }
    }

    /// Parse the stored string form. Unknown values are rejected so a
    /// corrupt row surfaces as an error instead of a silent default.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "collected" => Some(Self::Collected),
            "filtered" => Some(Self::Filtered),
            "enriched" => Some(Self::Enriched),
            "scored" => Some(Self::Scored),
            "output" => Some(Self::Output),
            "excluded" => Some(Self::Excluded),
            "cooldown" => Some(Self::Cooldown),
            _ => None,
        }
    }

    /// Position in the forward pipeline order. Side states sort last.
    pub fn forward_index(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::Collected => 1,
            Self::Filtered => 2,
            Self::Enriched => 3,
            Self::Scored => 4,
            Self::Output => 5,
            Self::Excluded | Self::Cooldown => u8::MAX,
        }
    }
}

/// A categorized outreach opportunity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleType {
    NoWebsite,
    OutdatedWebsite,
    NoOnlineBooking,
    LowReviews,
    PoorRatings,
    FounderLed,
}

impl AngleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoWebsite => "no_website",
            Self::OutdatedWebsite => "outdated_website",
            Self::NoOnlineBooking => "no_online_booking",
            Self::LowReviews => "low_reviews",
            Self::PoorRatings => "poor_ratings",
            Self::FounderLed => "founder_led",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no_website" => Some(Self::NoWebsite),
            "outdated_website" => Some(Self::OutdatedWebsite),
            "no_online_booking" => Some(Self::NoOnlineBooking),
            "low_reviews" => Some(Self::LowReviews),
            "poor_ratings" => Some(Self::PoorRatings),
            "founder_led" => Some(Self::FounderLed),
            _ => None,
        }
    }
}

/// The central entity: one durable, deduplicated business lead.
///
/// Keyed by the deterministic identity hash over canonicalized
/// name + city + region + country. Two raw records canonicalizing to the
/// same key always merge into this one row, regardless of run count or
/// discovery source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Identity key: SHA-256 hex over the canonicalized tuple.
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,

    pub status: LeadStatus,
    /// Integer score in [0, 100]; None until the scoring stage runs.
    pub score: Option<u32>,
    /// Human-readable reason tokens from the last scoring pass.
    pub score_reasons: Vec<String>,
    /// Angles eligible for outreach. Disjoint from `exhausted_angles`.
    pub active_angles: Vec<AngleType>,
    /// Angles already used in outreach; never resurface automatically.
    pub exhausted_angles: Vec<AngleType>,

    /// Non-null means permanently out of forward flow (absorbing unless
    /// explicitly refreshed).
    pub excluded_reason: Option<String>,
    /// Epoch ms until which the lead is held out of processing.
    pub cooldown_until: Option<i64>,

    pub last_contact_at: Option<i64>,
    pub last_contact_result: Option<String>,

    /// Source metadata, union-merged across discoveries.
    pub source_directories: Vec<String>,
    pub source_geos: Vec<String>,
    pub source_tags: Vec<String>,

    pub enrichment: Option<EnrichmentData>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,

    pub first_seen_at: i64,
    pub last_seen_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    /// True if the lead has any known contact channel, from its own fields
    /// or from enrichment.
    pub fn has_contact_info(&self) -> bool {
        if self.email.is_some() || self.phone.is_some() {
            return true;
        }
        self.enrichment
            .as_ref()
            .is_some_and(|e| !e.emails.is_empty() || !e.phones.is_empty())
    }

    /// True if the lead retains enough prior progress (enrichment payload
    /// or a prior score) to skip re-collection after a cooldown expires.
    pub fn has_prior_progress(&self) -> bool {
        self.score.is_some() || self.enrichment.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// True if the cooldown window is active at `now`.
    pub fn in_cooldown(&self, now: i64) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_string_form() {
        for status in [
            LeadStatus::New,
            LeadStatus::Collected,
            LeadStatus::Filtered,
            LeadStatus::Enriched,
            LeadStatus::Scored,
            LeadStatus::Output,
            LeadStatus::Excluded,
            LeadStatus::Cooldown,
        ] {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::parse("bogus"), None);
    }

    #[test]
    fn forward_index_orders_pipeline_states() {
        assert!(LeadStatus::New.forward_index() < LeadStatus::Collected.forward_index());
        assert!(LeadStatus::Scored.forward_index() < LeadStatus::Output.forward_index());
        assert_eq!(LeadStatus::Excluded.forward_index(), u8::MAX);
    }

    #[test]
    fn angle_round_trips_through_string_form() {
        for angle in [
            AngleType::NoWebsite,
            AngleType::OutdatedWebsite,
            AngleType::NoOnlineBooking,
            AngleType::LowReviews,
            AngleType::PoorRatings,
            AngleType::FounderLed,
        ] {
            assert_eq!(AngleType::parse(angle.as_str()), Some(angle));
        }
    }
}
