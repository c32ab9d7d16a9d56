use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::{
    config::CheckConfig,
    detection::threshold,
    types::{MarketData, PricePoint, Violation},
};

/// Flags period-over-period price movements whose magnitude exceeds the
/// configured threshold.
pub struct PriceChangeDetector {
    check: CheckConfig,
}

impl PriceChangeDetector {
    pub fn new(check: CheckConfig) -> Result<Self> {
        if check.period == 0 {
            return Err(anyhow!(
                "Check '{}' has period 0, expected at least 1",
                check.name
            ));
        }

        if !check.default_threshold.is_finite() || check.default_threshold <= 0.0 {
            return Err(anyhow!(
                "Check '{}' has invalid default_threshold: {}",
                check.name,
                check.default_threshold
            ));
        }

        for (entity_id, value) in &check.custom_thresholds {
            if !value.is_finite() || *value <= 0.0 {
                return Err(anyhow!(
                    "Check '{}' has invalid custom threshold {} for '{}'",
                    check.name,
                    value,
                    entity_id
                ));
            }
        }

        Ok(Self { check })
    }

    /// Run the check over every entity's series. Pure: identical inputs
    /// yield identical output, and nothing is mutated.
    ///
    /// Output is grouped by entity in ascending id order, chronological
    /// within an entity.
    pub fn detect(&self, data: &MarketData) -> Vec<Violation> {
        if !self.check.enabled {
            debug!("Check '{}' is disabled, skipping", self.check.name);
            return Vec::new();
        }

        let mut violations = Vec::new();

        for (entity_id, series) in data.entities() {
            self.scan_series(entity_id, series, &mut violations);
        }

        if !violations.is_empty() {
            info!("Found {} {} violations", violations.len(), self.check.name);
        }

        violations
    }

    fn scan_series(&self, entity_id: &str, series: &[PricePoint], out: &mut Vec<Violation>) {
        let period = self.check.period;
        let threshold = threshold::resolve(&self.check, entity_id);

        if series.len() <= period {
            debug!(
                "Entity '{}' has {} samples, not enough for a {}-period lookback",
                entity_id,
                series.len(),
                period
            );
            return;
        }

        // The first `period` samples have no lookback baseline.
        for i in period..series.len() {
            let previous = series[i - period];
            let current = series[i];

            // A zero baseline makes the change undefined, never a violation.
            if previous.price == 0.0 {
                continue;
            }

            let change_percent = (current.price - previous.price) / previous.price * 100.0;
            if !change_percent.is_finite() {
                continue;
            }

            // Strict inequality: a change of exactly the threshold passes.
            if change_percent.abs() > threshold {
                out.push(Violation::new(
                    entity_id.to_string(),
                    self.check.name.clone(),
                    current.date,
                    previous.price,
                    current.price,
                    change_percent,
                    threshold,
                ));
            }
        }
    }
}
