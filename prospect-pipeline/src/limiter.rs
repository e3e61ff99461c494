//! Outbound request rate limiting.
//!
//! One sliding-window limiter per source, built from the configured
//! per-source budgets. The enrich stage shares the mechanism with a rate
//! derived from the same configuration.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use prospect_core::config::SourceConfig;

/// Sliding-window rate limiter for outbound requests.
///
/// Tracks request timestamps within the last minute. When the window is
/// full, `acquire` computes the exact wait until the oldest request falls
/// out of the window (plus a small buffer) and sleeps for it; callers
/// never busy-poll.
pub struct RateLimiter {
    max_per_minute: u32,
    window: Mutex<VecDeque<Instant>>,
}

const WINDOW: Duration = Duration::from_secs(60);
const BUFFER: Duration = Duration::from_millis(50);

impl RateLimiter {
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            max_per_minute: max_per_minute.max(1),
            window: Mutex::new(VecDeque::new()),
        }
    }

    /// The request budget this limiter admits per minute.
    pub fn max_per_minute(&self) -> u32 {
        self.max_per_minute
    }

    /// Block until a request slot is available, then claim it.
    pub fn acquire(&self) {
        loop {
            let wait = {
                let mut window = match self.window.lock() {
                    Ok(w) => w,
                    Err(poisoned) => poisoned.into_inner(),
                };
                let now = Instant::now();
                while let Some(front) = window.front() {
                    if now.duration_since(*front) >= WINDOW {
                        window.pop_front();
                    } else {
                        break;
                    }
                }
                if (window.len() as u32) < self.max_per_minute {
                    window.push_back(now);
                    return;
                }
                // Full: wait exactly until the oldest entry expires.
                let oldest = *window
                    .front()
                    .unwrap_or(&now);
                WINDOW
                    .saturating_sub(now.duration_since(oldest))
                    .saturating_add(BUFFER)
            };
            std::thread::sleep(wait);
        }
    }
}

/// Per-source limiters keyed by `source_type`, one per configured source
/// at its configured budget. Sources sharing a type share a budget.
pub struct RateLimiterSet {
    limiters: HashMap<String, RateLimiter>,
    fallback: RateLimiter,
}

impl RateLimiterSet {
    pub fn from_configs(configs: &[SourceConfig]) -> Self {
        let mut limiters = HashMap::new();
        for config in configs {
            limiters.insert(
                config.source_type.clone(),
                RateLimiter::new(config.effective_requests_per_minute()),
            );
        }
        Self {
            limiters,
            fallback: RateLimiter::new(SourceConfig::default().effective_requests_per_minute()),
        }
    }

    /// The limiter for a source type. An unconfigured type gets the
    /// default budget.
    pub fn limiter_for(&self, source_type: &str) -> &RateLimiter {
        self.limiters.get(source_type).unwrap_or(&self.fallback)
    }

    /// The slowest configured budget, if any source is configured. Used to
    /// derive a conservative rate for enrichment fetches.
    pub fn slowest_rate(&self) -> Option<u32> {
        self.limiters.values().map(RateLimiter::max_per_minute).min()
    }
}
