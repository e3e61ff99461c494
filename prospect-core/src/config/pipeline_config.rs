//! Pipeline-wide settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path to the SQLite database. Default: `prospect.db`.
    pub db_path: Option<String>,
    /// Leads selected per stage run. Default: 50.
    pub batch_size: Option<u32>,
    /// Hard cap on leads touched per run, across all stages. Unset means
    /// the batch size is the only bound.
    pub lead_limit: Option<u32>,
}

impl PipelineConfig {
    pub fn effective_db_path(&self) -> &str {
        self.db_path.as_deref().unwrap_or("prospect.db")
    }

    pub fn effective_batch_size(&self) -> u32 {
        self.batch_size.unwrap_or(50)
    }

    /// The per-stage selection limit: the smaller of batch size and the
    /// per-run lead limit when one is set.
    pub fn effective_selection_limit(&self) -> u32 {
        match self.lead_limit {
            Some(limit) => limit.min(self.effective_batch_size()),
            None => self.effective_batch_size(),
        }
    }
}
