//! Pipeline orchestrator: composes the seven stages in fixed order.
//!
//! A stage failure aborts the remaining stages of the invocation but
//! performs no rollback; idempotent identity and status-gated selection
//! make the next invocation resume safely from persisted state.

use prospect_core::config::SourceConfig;
use prospect_core::errors::{ErrorCode, PipelineError};
use prospect_core::types::StageName;

use crate::context::RunContext;
use crate::cooldown::{NoSignalChange, SignalChangeCheck};
use crate::enrich::Enricher;
use crate::limiter::RateLimiter;
use crate::output::OutputWriter;
use crate::sources::{DiscoverySource, SourceRegistry};
use crate::stages::{self, StageSummary};

const DEFAULT_ENRICH_RPM: u32 = 30;

/// The rate for enrichment fetches: an explicit override wins, otherwise
/// the slowest configured source budget, otherwise the default.
fn enrich_rate(override_rpm: Option<u32>, sources: &[SourceConfig]) -> u32 {
    override_rpm.unwrap_or_else(|| {
        sources
            .iter()
            .map(SourceConfig::effective_requests_per_minute)
            .min()
            .unwrap_or(DEFAULT_ENRICH_RPM)
    })
}

/// Which stages to run. Default: all seven.
#[derive(Debug, Clone, Default)]
pub struct PipelinePlan {
    skip: Vec<StageName>,
}

impl PipelinePlan {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn skip(mut self, stage: StageName) -> Self {
        if !self.skip.contains(&stage) {
            self.skip.push(stage);
        }
        self
    }

    /// A plan that runs only the given stage.
    pub fn only(stage: StageName) -> Self {
        let mut plan = Self::default();
        for s in StageName::all() {
            if s != stage {
                plan.skip.push(s);
            }
        }
        plan
    }

    fn skips(&self, stage: StageName) -> bool {
        self.skip.contains(&stage)
    }
}

/// Per-stage summaries of one full invocation.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub summaries: Vec<StageSummary>,
}

impl PipelineReport {
    pub fn summary_for(&self, stage: StageName) -> Option<&StageSummary> {
        self.summaries.iter().find(|s| s.stage == stage)
    }
}

/// The pipeline with its pluggable collaborators. Collaborators default
/// to inert implementations: no sources, no enricher (leads advance
/// without a payload), no output writer (the output stage is skipped),
/// and a signal check that always reports "no change".
pub struct Pipeline {
    registry: SourceRegistry,
    enricher: Option<Box<dyn Enricher>>,
    writer: Option<Box<dyn OutputWriter>>,
    output_fields: Option<Vec<String>>,
    signal_check: Box<dyn SignalChangeCheck>,
    enrich_rpm: Option<u32>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
            enricher: None,
            writer: None,
            output_fields: None,
            signal_check: Box::new(NoSignalChange),
            enrich_rpm: None,
        }
    }

    pub fn with_source(mut self, source: Box<dyn DiscoverySource>) -> Self {
        self.registry.register(source);
        self
    }

    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_writer(mut self, writer: Box<dyn OutputWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Override the default output field projection.
    pub fn with_output_fields(mut self, fields: Vec<String>) -> Self {
        self.output_fields = Some(fields);
        self
    }

    pub fn with_signal_check(mut self, check: Box<dyn SignalChangeCheck>) -> Self {
        self.signal_check = check;
        self
    }

    /// Override the enrichment fetch rate. Without an override the rate
    /// follows the slowest configured source budget.
    pub fn with_enrich_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.enrich_rpm = Some(requests_per_minute);
        self
    }

    /// Run the planned stages in fixed order. The first stage error aborts
    /// the rest; the report up to that point is discarded in favor of the
    /// error, but every persisted lead and run row remains.
    pub fn run(&mut self, ctx: &RunContext, plan: &PipelinePlan) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::default();
        let limiter = RateLimiter::new(enrich_rate(self.enrich_rpm, &ctx.config.sources));

        for stage in StageName::all() {
            if plan.skips(stage) {
                tracing::debug!(stage = stage.as_str(), "stage skipped by plan");
                continue;
            }

            let result = match stage {
                StageName::Collect => stages::collect::run(ctx, &self.registry),
                StageName::Filter => stages::filter::run(ctx),
                StageName::Enrich => {
                    stages::enrich::run(ctx, self.enricher.as_deref(), &limiter)
                }
                StageName::Score => stages::score::run(ctx),
                StageName::Output => match self.writer.as_deref_mut() {
                    Some(writer) => {
                        let fields: Option<Vec<&str>> = self
                            .output_fields
                            .as_ref()
                            .map(|f| f.iter().map(String::as_str).collect());
                        stages::output::run(ctx, writer, fields.as_deref())
                    }
                    None => {
                        tracing::debug!("no output writer configured, skipping output stage");
                        continue;
                    }
                },
                StageName::Cooldown => stages::cooldown::run(ctx),
                StageName::Refresh => stages::refresh::run(ctx, self.signal_check.as_ref()),
            };

            match result {
                Ok(summary) => report.summaries.push(summary),
                Err(e) => {
                    tracing::error!(
                        stage = stage.as_str(),
                        code = e.error_code(),
                        error = %e,
                        "stage failed, aborting remaining stages"
                    );
                    return Err(e);
                }
            }
        }

        ctx.db.checkpoint()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(rpm: Option<u32>) -> SourceConfig {
        SourceConfig {
            source_type: "static".to_string(),
            requests_per_minute: rpm,
            ..Default::default()
        }
    }

    #[test]
    fn enrich_rate_follows_the_slowest_configured_source() {
        let sources = vec![source(Some(5)), source(Some(20)), source(None)];
        assert_eq!(enrich_rate(None, &sources), 5);
    }

    #[test]
    fn enrich_rate_override_wins_over_source_budgets() {
        let sources = vec![source(Some(5))];
        assert_eq!(enrich_rate(Some(120), &sources), 120);
    }

    #[test]
    fn enrich_rate_defaults_without_sources() {
        assert_eq!(enrich_rate(None, &[]), DEFAULT_ENRICH_RPM);
    }
}
