use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
    pub checks: Vec<CheckConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    pub results_path: PathBuf,
}

/// One configured price-movement check. Every field is required: a check
/// missing a field is a configuration error, not a silent default.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CheckConfig {
    pub name: String,
    pub enabled: bool,
    pub period: usize,
    pub default_threshold: f64,
    pub custom_thresholds: HashMap<String, f64>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("MONITOR"));

        // Override data directory from environment if present
        if let Ok(data_dir) = std::env::var("MONITOR_DATA_DIR") {
            settings = settings.set_override("data.directory", data_dir)?;
        }

        // Override results path from environment if present
        if let Ok(results_path) = std::env::var("MONITOR_RESULTS_PATH") {
            settings = settings.set_override("output.results_path", results_path)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }
}
