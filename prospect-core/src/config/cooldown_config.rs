//! Cooldown windows: defaults plus per-outcome and per-failure overrides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::FetchFailure;

/// Milliseconds in a day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CooldownConfig {
    /// Default cooldown in days. Default: 30.
    pub default_days: Option<u32>,
    /// Cooldown applied when scoring leaves zero active angles. Default: 30.
    pub no_angles_days: Option<u32>,
    /// Cooldown applied after a lead is exported. Default: 90.
    pub post_export_days: Option<u32>,
    /// Overrides keyed by contact-outcome string (e.g. "no_reply": 60).
    pub per_outcome: HashMap<String, u32>,
    /// Overrides keyed by fetch-failure kind (e.g. "rate_limited": 7).
    pub per_failure: HashMap<String, u32>,
}

impl CooldownConfig {
    pub fn effective_default_days(&self) -> u32 {
        self.default_days.unwrap_or(30)
    }

    pub fn effective_no_angles_days(&self) -> u32 {
        self.no_angles_days.unwrap_or(30)
    }

    pub fn effective_post_export_days(&self) -> u32 {
        self.post_export_days.unwrap_or(90)
    }

    /// Cooldown days for an enrichment failure of the given kind.
    pub fn days_for_failure(&self, kind: FetchFailure) -> u32 {
        self.per_failure
            .get(kind.as_str())
            .copied()
            .unwrap_or_else(|| self.effective_default_days())
    }

    /// Cooldown days after a contact attempt with the given outcome.
    pub fn days_for_outcome(&self, outcome: &str) -> u32 {
        self.per_outcome
            .get(outcome)
            .copied()
            .unwrap_or_else(|| self.effective_default_days())
    }

    /// Convert a day count to the epoch-ms deadline from `now`.
    pub fn deadline(now: i64, days: u32) -> i64 {
        now + i64::from(days) * DAY_MS
    }
}
