use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    config::Config,
    data::{loader, writer},
    detection::PriceChangeDetector,
    pipeline::RunSummary,
    types::Violation,
};

/// Drives one full run: load data, run every configured check in order,
/// write the concatenated results.
pub struct PipelineRunner {
    config: Config,
}

impl PipelineRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunSummary> {
        info!("Loading market data");
        let data = loader::load_market_data(&self.config.data.directory)?;

        let mut summary = RunSummary::new();
        summary.record_data(data.point_count(), data.entity_count());

        // Results keep configuration order: all of the first check's
        // violations, then the second's, and so on.
        let mut all_violations: Vec<Violation> = Vec::new();

        for check in &self.config.checks {
            debug!("Running {} check", check.name);

            let detector = PriceChangeDetector::new(check.clone())
                .with_context(|| format!("Invalid configuration for check '{}'", check.name))?;
            let violations = detector.detect(&data);

            info!("Found {} {} violations", violations.len(), check.name);
            summary.record_check(&check.name, check.enabled, violations.len());
            all_violations.extend(violations);
        }

        if all_violations.is_empty() {
            info!("No violations found");
        } else {
            writer::write_violations(&self.config.output.results_path, &all_violations)?;
            summary.record_results_path(&self.config.output.results_path);
        }

        Ok(summary)
    }
}
