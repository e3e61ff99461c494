//! Run-scoped context threaded through every stage.

use std::sync::Arc;

use prospect_core::config::ProspectConfig;
use prospect_core::traits::CancellationToken;
use prospect_storage::DatabaseManager;

/// Everything a stage needs: the store, the resolved configuration, and
/// the cancellation token. Built once per invocation and passed by
/// reference; no stage mutates it.
pub struct RunContext {
    pub db: Arc<DatabaseManager>,
    pub config: ProspectConfig,
    pub token: CancellationToken,
}

impl RunContext {
    pub fn new(db: Arc<DatabaseManager>, config: ProspectConfig) -> Self {
        Self {
            db,
            config,
            token: CancellationToken::new(),
        }
    }

    /// The per-stage selection limit from the pipeline config.
    pub fn selection_limit(&self) -> Option<u32> {
        Some(self.config.pipeline.effective_selection_limit())
    }
}
