//! Pipeline errors — run-level failures that abort the current invocation.
//!
//! Record-level failures never become a `PipelineError`; they are recorded
//! against the lead and counted in the run's failed counter. Anything that
//! reaches this enum marks the run failed and aborts the remaining stages.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, SourceError, StorageError};

/// Errors that abort a stage run. Aggregates subsystem errors via `From`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output writer failed: {0}")]
    Output(String),

    #[error("Stage {stage} failed: {message}")]
    StageFailed { stage: String, message: String },

    #[error("Run cancelled")]
    Cancelled,
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
            Self::Output(_) => error_code::OUTPUT_ERROR,
            Self::StageFailed { .. } => error_code::STAGE_FAILED,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
