//! Top-level Prospect configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CooldownConfig, FilterConfig, PipelineConfig, RefreshConfig, ScoringConfig,
    SourceConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Caller overrides (applied via `apply_overrides`)
/// 2. Environment variables (`PROSPECT_*`)
/// 3. Project config (`prospect.toml` in project root)
/// 4. User config (`~/.prospect/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProspectConfig {
    pub pipeline: PipelineConfig,
    pub scoring: ScoringConfig,
    pub filter: FilterConfig,
    pub cooldown: CooldownConfig,
    pub refresh: RefreshConfig,
    pub sources: Vec<SourceConfig>,
}

/// Overrides the embedding application (CLI or otherwise) can apply on top
/// of every file/env layer.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub db_path: Option<String>,
    pub batch_size: Option<u32>,
    pub lead_limit: Option<u32>,
    pub min_score: Option<u32>,
}

impl ProspectConfig {
    /// Load configuration with layered resolution. Validation failures are
    /// fatal: a broken config must never start a run.
    pub fn load(root: &Path, overrides: Option<&RunOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                match Self::merge_toml_file(&mut config, &user_path) {
                    Ok(()) | Err(ConfigError::FileNotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        // Layer 3: project config
        let project_path = root.join("prospect.toml");
        if project_path.exists() {
            Self::merge_toml_file(&mut config, &project_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): caller overrides
        if let Some(ov) = overrides {
            Self::apply_overrides(&mut config, ov);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the final configuration values.
    pub fn validate(config: &ProspectConfig) -> Result<(), ConfigError> {
        if let Some(score) = config.scoring.min_score {
            if score > 100 {
                return Err(ConfigError::ValidationFailed {
                    field: "scoring.min_score".to_string(),
                    message: "must be between 0 and 100".to_string(),
                });
            }
        }
        if let Some(threshold) = config.scoring.rating_poor_threshold {
            if !(0.0..=5.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "scoring.rating_poor_threshold".to_string(),
                    message: "must be between 0.0 and 5.0".to_string(),
                });
            }
        }
        if let Some(batch) = config.pipeline.batch_size {
            if batch == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "pipeline.batch_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        for source in &config.sources {
            if source.source_type.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "sources.source_type".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ProspectConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: ProspectConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`: `other` wins wherever it carries a value.
    fn merge(base: &mut ProspectConfig, other: &ProspectConfig) {
        // Pipeline
        if other.pipeline.db_path.is_some() {
            base.pipeline.db_path = other.pipeline.db_path.clone();
        }
        if other.pipeline.batch_size.is_some() {
            base.pipeline.batch_size = other.pipeline.batch_size;
        }
        if other.pipeline.lead_limit.is_some() {
            base.pipeline.lead_limit = other.pipeline.lead_limit;
        }

        // Scoring: Option fields override pairwise.
        let s = &other.scoring;
        let b = &mut base.scoring;
        macro_rules! take {
            ($field:ident) => {
                if s.$field.is_some() {
                    b.$field = s.$field;
                }
            };
        }
        take!(contact_weight);
        take!(website_bonus);
        take!(no_website_weight);
        take!(outdated_website_weight);
        take!(outdated_days);
        take!(no_booking_weight);
        take!(review_low_threshold);
        take!(low_reviews_weight);
        take!(review_bonus_per_review);
        take!(review_max_bonus);
        take!(rating_poor_threshold);
        take!(poor_ratings_weight);
        take!(rating_weight);
        take!(founder_led_weight);
        take!(founder_employee_max);
        take!(min_score);

        // Filter: non-empty lists replace.
        if !other.filter.exclude_categories.is_empty() {
            base.filter.exclude_categories = other.filter.exclude_categories.clone();
        }
        if !other.filter.exclude_keywords.is_empty() {
            base.filter.exclude_keywords = other.filter.exclude_keywords.clone();
        }
        if !other.filter.rules.is_empty() {
            base.filter.rules = other.filter.rules.clone();
        }

        // Cooldown
        if other.cooldown.default_days.is_some() {
            base.cooldown.default_days = other.cooldown.default_days;
        }
        if other.cooldown.no_angles_days.is_some() {
            base.cooldown.no_angles_days = other.cooldown.no_angles_days;
        }
        if other.cooldown.post_export_days.is_some() {
            base.cooldown.post_export_days = other.cooldown.post_export_days;
        }
        if !other.cooldown.per_outcome.is_empty() {
            base.cooldown.per_outcome = other.cooldown.per_outcome.clone();
        }
        if !other.cooldown.per_failure.is_empty() {
            base.cooldown.per_failure = other.cooldown.per_failure.clone();
        }

        // Refresh
        if other.refresh.expired_sweep.is_some() {
            base.refresh.expired_sweep = other.refresh.expired_sweep;
        }
        if other.refresh.signal_sweep.is_some() {
            base.refresh.signal_sweep = other.refresh.signal_sweep;
        }
        if other.refresh.staleness_days.is_some() {
            base.refresh.staleness_days = other.refresh.staleness_days;
        }
        if other.refresh.retry_exhausted_angles.is_some() {
            base.refresh.retry_exhausted_angles = other.refresh.retry_exhausted_angles;
        }

        // Sources: a non-empty list replaces wholesale.
        if !other.sources.is_empty() {
            base.sources = other.sources.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PROSPECT_DB_PATH`, `PROSPECT_BATCH_SIZE`, `PROSPECT_MIN_SCORE`, …
    fn apply_env_overrides(config: &mut ProspectConfig) {
        if let Ok(val) = std::env::var("PROSPECT_DB_PATH") {
            config.pipeline.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("PROSPECT_BATCH_SIZE") {
            if let Ok(v) = val.parse::<u32>() {
                config.pipeline.batch_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PROSPECT_LEAD_LIMIT") {
            if let Ok(v) = val.parse::<u32>() {
                config.pipeline.lead_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PROSPECT_MIN_SCORE") {
            if let Ok(v) = val.parse::<u32>() {
                config.scoring.min_score = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PROSPECT_STALENESS_DAYS") {
            if let Ok(v) = val.parse::<u32>() {
                config.refresh.staleness_days = Some(v);
            }
        }
    }

    /// Apply caller overrides (highest priority).
    fn apply_overrides(config: &mut ProspectConfig, ov: &RunOverrides) {
        if let Some(ref v) = ov.db_path {
            config.pipeline.db_path = Some(v.clone());
        }
        if let Some(v) = ov.batch_size {
            config.pipeline.batch_size = Some(v);
        }
        if let Some(v) = ov.lead_limit {
            config.pipeline.lead_limit = Some(v);
        }
        if let Some(v) = ov.min_score {
            config.scoring.min_score = Some(v);
        }
    }
}

/// Returns the user config path: `~/.prospect/config.toml`.
fn user_config_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".prospect").join("config.toml"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
