//! Discovery source errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while producing raw business records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unknown source type: {0}")]
    UnknownSourceType(String),

    #[error("Source {source_name} failed: {message}")]
    ProduceFailed { source_name: String, message: String },

    #[error("Invalid record from {source_name}: {message}")]
    InvalidRecord { source_name: String, message: String },
}

impl ErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        error_code::SOURCE_ERROR
    }
}
