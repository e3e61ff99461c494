//! Cooldown/refresh controller toggles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefreshConfig {
    /// Run the expired-cooldown sweep. Default: true.
    pub expired_sweep: Option<bool>,
    /// Run the signal-change sweep. Default: true.
    pub signal_sweep: Option<bool>,
    /// Days since last update before a lead is considered stale. Default: 90.
    pub staleness_days: Option<u32>,
    /// Clear the exhausted-angle set when a cooldown expires, allowing
    /// angles to be re-tried. Default: false.
    pub retry_exhausted_angles: Option<bool>,
}

impl RefreshConfig {
    pub fn effective_expired_sweep(&self) -> bool {
        self.expired_sweep.unwrap_or(true)
    }

    pub fn effective_signal_sweep(&self) -> bool {
        self.signal_sweep.unwrap_or(true)
    }

    pub fn effective_staleness_days(&self) -> u32 {
        self.staleness_days.unwrap_or(90)
    }

    pub fn effective_retry_exhausted_angles(&self) -> bool {
        self.retry_exhausted_angles.unwrap_or(false)
    }
}
