//! Raw discovery records — the staging queue entries before identity.

use serde::{Deserialize, Serialize};

/// The shape every discovery source must map its records to.
/// Only `name` is mandatory; everything else is best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBusinessData {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    /// Originating directory/listing site name.
    pub directory: Option<String>,
    /// Geographic label of the search that produced the record.
    pub geo: Option<String>,
    /// Category tags as reported by the source.
    pub tags: Vec<String>,
}

/// Ephemeral staging record. Exists only until the collect stage consumes
/// it; many raw discoveries may collapse into one lead.
#[derive(Debug, Clone)]
pub struct RawDiscovery {
    pub id: i64,
    pub run_id: Option<i64>,
    pub source: String,
    pub data: RawBusinessData,
    pub discovered_at: i64,
    pub processed: bool,
}
