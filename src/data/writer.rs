use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::Violation;

/// Write the run's violations as CSV. The header row carries exactly the
/// seven record fields in declaration order:
/// `entity_id,check_type,date,previous_value,current_value,change_percent,threshold`.
pub fn write_violations(path: &Path, violations: &[Violation]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create results file '{}'", path.display()))?;
    write_records(file, violations)?;

    info!(
        "Results saved to {} ({} total violations)",
        path.display(),
        violations.len()
    );

    Ok(())
}

fn write_records<W: Write>(writer: W, violations: &[Violation]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for violation in violations {
        csv_writer
            .serialize(violation)
            .context("Failed to serialize violation record")?;
    }

    csv_writer.flush().context("Failed to flush results file")?;
    Ok(())
}
