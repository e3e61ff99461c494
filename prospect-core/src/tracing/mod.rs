//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Prospect tracing/logging system.
///
/// Reads the `PROSPECT_LOG` environment variable for per-subsystem levels.
/// Format: `PROSPECT_LOG=prospect_storage=debug,prospect_pipeline=info`
///
/// Falls back to `prospect=info` if `PROSPECT_LOG` is not set or invalid.
///
/// This function is idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("PROSPECT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("prospect=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
