//! Run records — one per stage invocation.

use serde::{Deserialize, Serialize};

/// The seven pipeline stages, in fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Collect,
    Filter,
    Enrich,
    Score,
    Output,
    Cooldown,
    Refresh,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Filter => "filter",
            Self::Enrich => "enrich",
            Self::Score => "score",
            Self::Output => "output",
            Self::Cooldown => "cooldown",
            Self::Refresh => "refresh",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "collect" => Some(Self::Collect),
            "filter" => Some(Self::Filter),
            "enrich" => Some(Self::Enrich),
            "score" => Some(Self::Score),
            "output" => Some(Self::Output),
            "cooldown" => Some(Self::Cooldown),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }

    /// The full pipeline in execution order.
    pub fn all() -> [StageName; 7] {
        [
            Self::Collect,
            Self::Filter,
            Self::Enrich,
            Self::Score,
            Self::Output,
            Self::Cooldown,
            Self::Refresh,
        ]
    }
}

/// Terminal and non-terminal run states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One stage invocation. Counters are monotonic: they are only ever
/// incremented during execution, and `processed >= passed + failed` holds
/// at every checkpoint.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: i64,
    pub stage: StageName,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub status: RunStatus,
    pub processed: u64,
    pub passed: u64,
    pub failed: u64,
    pub error: Option<String>,
    pub metadata: Option<String>,
}
