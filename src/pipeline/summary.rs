use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Counters for one pipeline run, in configuration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub entity_count: usize,
    pub total_violations: usize,
    pub check_outcomes: Vec<CheckOutcome>,
    pub results_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub enabled: bool,
    pub violations: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            rows_loaded: 0,
            entity_count: 0,
            total_violations: 0,
            check_outcomes: Vec::new(),
            results_path: None,
        }
    }

    pub fn record_data(&mut self, rows_loaded: usize, entity_count: usize) {
        self.rows_loaded = rows_loaded;
        self.entity_count = entity_count;
    }

    pub fn record_check(&mut self, name: &str, enabled: bool, violations: usize) {
        self.total_violations += violations;
        self.check_outcomes.push(CheckOutcome {
            name: name.to_string(),
            enabled,
            violations,
        });
    }

    pub fn record_results_path(&mut self, path: &Path) {
        self.results_path = Some(path.to_path_buf());
    }

    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Price Anomaly Monitor Report ===\n");
        report.push_str(&format!(
            "Rows Loaded: {} across {} entities\n",
            self.rows_loaded, self.entity_count
        ));
        report.push_str(&format!("Total Violations: {}\n", self.total_violations));

        report.push_str("\n=== Check Outcomes ===\n");
        for outcome in &self.check_outcomes {
            if outcome.enabled {
                report.push_str(&format!(
                    "{}: {} violations\n",
                    outcome.name, outcome.violations
                ));
            } else {
                report.push_str(&format!("{}: disabled\n", outcome.name));
            }
        }

        match &self.results_path {
            Some(path) => {
                report.push_str(&format!("\nResults saved to {}\n", path.display()));
            }
            None => {
                report.push_str("\nNo violations found.\n");
            }
        }

        report
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize run summary: {}", e))
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
