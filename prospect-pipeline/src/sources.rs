//! Discovery sources: the pluggable record-producing seam.
//!
//! One implementing variant per source type, registered in a lookup keyed
//! by the config's `source_type` string. The core is indifferent to how
//! records are produced; it only requires the [`RawBusinessData`] shape.

use std::collections::HashMap;

use prospect_core::config::SourceConfig;
use prospect_core::errors::SourceError;
use prospect_core::types::RawBusinessData;

use crate::limiter::RateLimiter;

/// A discovery source produces a finite batch of raw business records for
/// one source configuration. The optional limit in the config caps the
/// batch; producing fewer records is always allowed.
///
/// Implementations that make outbound requests must claim a slot from the
/// limiter before each request; it carries the source's configured budget.
pub trait DiscoverySource: Send + Sync {
    /// The `source_type` key this implementation answers to.
    fn source_type(&self) -> &str;

    fn discover(
        &self,
        config: &SourceConfig,
        limiter: &RateLimiter,
    ) -> Result<Vec<RawBusinessData>, SourceError>;
}

/// Registry of discovery sources keyed by source type.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Box<dyn DiscoverySource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Box<dyn DiscoverySource>) {
        self.sources.insert(source.source_type().to_string(), source);
    }

    pub fn get(&self, source_type: &str) -> Result<&dyn DiscoverySource, SourceError> {
        self.sources
            .get(source_type)
            .map(|s| s.as_ref())
            .ok_or_else(|| SourceError::UnknownSourceType(source_type.to_string()))
    }
}

/// A source over a fixed record list. Used for seeding from static data
/// and throughout the test suite.
pub struct StaticSource {
    source_type: String,
    records: Vec<RawBusinessData>,
}

impl StaticSource {
    pub fn new(source_type: impl Into<String>, records: Vec<RawBusinessData>) -> Self {
        Self {
            source_type: source_type.into(),
            records,
        }
    }
}

impl DiscoverySource for StaticSource {
    fn source_type(&self) -> &str {
        &self.source_type
    }

    fn discover(
        &self,
        config: &SourceConfig,
        _limiter: &RateLimiter,
    ) -> Result<Vec<RawBusinessData>, SourceError> {
        // No outbound requests, nothing to gate.
        let limit = config.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> RawBusinessData {
        RawBusinessData {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn registry_resolves_by_source_type() {
        let mut registry = SourceRegistry::new();
        registry.register(Box::new(StaticSource::new("static", vec![record("A")])));

        assert!(registry.get("static").is_ok());
        let err = registry.get("maps").map(|_| ()).unwrap_err();
        assert!(matches!(err, SourceError::UnknownSourceType(t) if t == "maps"));
    }

    #[test]
    fn static_source_honors_the_limit() {
        let source = StaticSource::new(
            "static",
            vec![record("A"), record("B"), record("C")],
        );
        let config = SourceConfig {
            source_type: "static".to_string(),
            limit: Some(2),
            ..Default::default()
        };
        let limiter = RateLimiter::new(30);
        let records = source.discover(&config, &limiter).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "A");
    }
}
