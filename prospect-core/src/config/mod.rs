//! Configuration for every subsystem.
//!
//! No evaluator hardcodes a threshold: scoring weights, filter rules,
//! cooldown windows, refresh toggles, and batch sizes all live here and are
//! passed explicitly into stage and component constructors. There is no
//! process-wide config singleton.

pub mod cooldown_config;
pub mod filter_config;
pub mod pipeline_config;
pub mod prospect_config;
pub mod refresh_config;
pub mod scoring_config;
pub mod source_config;

pub use cooldown_config::CooldownConfig;
pub use filter_config::{FilterConfig, FilterRule, RuleOp, RuleValue};
pub use pipeline_config::PipelineConfig;
pub use prospect_config::{ProspectConfig, RunOverrides};
pub use refresh_config::RefreshConfig;
pub use scoring_config::ScoringConfig;
pub use source_config::SourceConfig;
