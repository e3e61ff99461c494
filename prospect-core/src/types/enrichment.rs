//! Enrichment payload and the fetch failure taxonomy.

use serde::{Deserialize, Serialize};

/// Signals extracted from a lead's web presence by the enrichment
/// collaborator. The core only reads these typed fields; how they were
/// detected is the collaborator's business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentData {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub social_links: Vec<String>,
    /// True when an online-booking signal was detected on the site.
    pub has_online_booking: bool,
    /// Last-update timestamp of the website (epoch ms), when detectable.
    pub last_updated_at: Option<i64>,
    /// True when an explicit founder/owner profile was found.
    pub founder_profile: bool,
    pub employee_count: Option<u32>,
}

impl EnrichmentData {
    /// True if the payload carries no signal at all.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.phones.is_empty()
            && self.social_links.is_empty()
            && !self.has_online_booking
            && self.last_updated_at.is_none()
            && !self.founder_profile
            && self.employee_count.is_none()
    }
}

/// Fixed failure taxonomy for enrichment fetches.
///
/// The scoring engine and the failure-cooldown policy consume only this
/// tag, never the raw page content or transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailure {
    NotFound,
    RateLimited,
    DnsError,
    TlsError,
    Timeout,
    BotChallenge,
    Unknown,
}

impl FetchFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::DnsError => "dns_error",
            Self::TlsError => "tls_error",
            Self::Timeout => "timeout",
            Self::BotChallenge => "bot_challenge",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_found" => Some(Self::NotFound),
            "rate_limited" => Some(Self::RateLimited),
            "dns_error" => Some(Self::DnsError),
            "tls_error" => Some(Self::TlsError),
            "timeout" => Some(Self::Timeout),
            "bot_challenge" => Some(Self::BotChallenge),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// One entry in a lead's append-only enrichment failure log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    pub id: i64,
    pub lead_id: String,
    pub url: Option<String>,
    pub kind: FetchFailure,
    pub message: Option<String>,
    pub occurred_at: i64,
}
