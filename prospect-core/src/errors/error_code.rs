//! ErrorCode trait — stable string codes for run records and logs.

/// Trait for converting Prospect errors to stable error code strings.
/// Failed run rows store `[ERROR_CODE] message` so operators can grep
/// run history without parsing free-form messages.
pub trait ErrorCode {
    /// Returns the stable error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string recorded on failed runs: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants recorded on failed run rows.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const SOURCE_ERROR: &str = "SOURCE_ERROR";
pub const OUTPUT_ERROR: &str = "OUTPUT_ERROR";
pub const STAGE_FAILED: &str = "STAGE_FAILED";
pub const CANCELLED: &str = "CANCELLED";
