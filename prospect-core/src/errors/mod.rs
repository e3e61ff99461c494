//! Error handling for Prospect.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod source_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use pipeline_error::PipelineError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
