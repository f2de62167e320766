//! Prometheus counters served on `/metrics`.
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Counters for the report lifecycle
#[derive(Clone)]
pub struct ApiMetrics {
    registry: Registry,
    pub reports_ingested: IntCounter,
    pub validation_failures: IntCounter,
    pub reports_scored: IntCounter,
    pub integrity_failures: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reports_ingested = counter(
            &registry,
            "peptiq_reports_ingested_total",
            "Lab reports accepted by ingestion",
        )?;
        let validation_failures = counter(
            &registry,
            "peptiq_validation_failures_total",
            "Submissions rejected by validation",
        )?;
        let reports_scored = counter(&registry, "peptiq_reports_scored_total", "Reports scored")?;
        let integrity_failures = counter(
            &registry,
            "peptiq_integrity_failures_total",
            "Integrity checks that found a changed payload",
        )?;

        Ok(Self {
            registry,
            reports_ingested,
            validation_failures,
            reports_scored,
            integrity_failures,
        })
    }

    /// Text exposition of every counter
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}
