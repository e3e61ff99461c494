//! Per-source discovery configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// Source type key used to look up the implementation in the registry.
    pub source_type: String,
    /// Search query or listing path, source-specific.
    pub query: Option<String>,
    /// Geographic label for the search.
    pub geo: Option<String>,
    /// Maximum records to pull from this source per run.
    pub limit: Option<u32>,
    /// Outbound request budget for this source. Default: 30.
    pub requests_per_minute: Option<u32>,
    /// Tags stamped onto every record from this source.
    pub tags: Vec<String>,
}

impl SourceConfig {
    pub fn effective_requests_per_minute(&self) -> u32 {
        self.requests_per_minute.unwrap_or(30)
    }
}
