use anyhow::Result;
use price_anomaly_monitor::{config::Config, pipeline::PipelineRunner};
use tracing::{error, info, Level};
use tracing_subscriber;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting Price Anomaly Monitor");

    // Load configuration
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let runner = PipelineRunner::new(config);
    let summary = runner.run().map_err(|e| {
        error!("Pipeline run failed: {}", e);
        e
    })?;

    println!("{}", summary.generate_report());

    info!("Price Anomaly Monitor run complete");
    Ok(())
}
