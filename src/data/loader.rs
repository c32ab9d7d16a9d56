use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::types::{MarketData, PricePoint};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load every CSV file in `dir` into one market data collection.
///
/// Each file carries one series: two columns, the first holding the date
/// and the second the price, with the second column's header naming the
/// entity (e.g. `SP500`). Rows for the same entity found across files merge
/// into a single series, which is re-sorted chronologically afterwards.
///
/// Malformed input is fatal: an unreadable file, an unparseable date or
/// price, or a directory with no CSV files at all aborts the run.
pub fn load_market_data(dir: &Path) -> Result<MarketData> {
    let files = discover_csv_files(dir)?;
    if files.is_empty() {
        bail!("No CSV files found in '{}'", dir.display());
    }

    let mut data = MarketData::new();
    for path in &files {
        let file =
            File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
        let entity_id = read_series(file, &mut data)
            .with_context(|| format!("Failed to parse '{}'", path.display()))?;
        debug!("Loaded series '{}' from {}", entity_id, path.display());
    }

    data.sort_series();

    info!(
        "Loaded {} rows for {} entities",
        data.point_count(),
        data.entity_count()
    );

    Ok(data)
}

/// Non-recursive `*.csv` scan, sorted by file name so load order is stable.
fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Parse one series into `data`, returning the entity tag taken from the
/// second column's header.
fn read_series<R: Read>(reader: R, data: &mut MarketData) -> Result<String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    if headers.len() < 2 {
        bail!(
            "Expected two columns (date, price), got {}",
            headers.len()
        );
    }

    let entity_id = match headers.get(1) {
        Some(header) if !header.is_empty() => header.to_string(),
        _ => bail!("Second column header is empty; it must name the entity"),
    };

    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record.with_context(|| format!("Bad CSV record at data row {}", row))?;

        let date_field = record
            .get(0)
            .ok_or_else(|| anyhow!("Missing date at data row {}", row))?;
        let price_field = record
            .get(1)
            .ok_or_else(|| anyhow!("Missing price at data row {}", row))?;

        let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT)
            .with_context(|| format!("Unparseable date '{}' at data row {}", date_field, row))?;
        let price: f64 = price_field
            .parse()
            .with_context(|| format!("Unparseable price '{}' at data row {}", price_field, row))?;

        data.push(&entity_id, PricePoint { date, price });
    }

    Ok(entity_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_read_series_takes_entity_from_header() {
        let csv = "date,SP500\n2024-01-01,100.0\n2024-01-02,101.5\n";
        let mut data = MarketData::new();

        let entity_id = read_series(csv.as_bytes(), &mut data).unwrap();
        assert_eq!(entity_id, "SP500");

        let series = data.series("SP500").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date("2024-01-01"));
        assert_eq!(series[0].price, 100.0);
        assert_eq!(series[1].price, 101.5);
    }

    #[test]
    fn test_read_series_rejects_bad_date() {
        let csv = "date,SP500\n01/02/2024,100.0\n";
        let mut data = MarketData::new();

        let result = read_series(csv.as_bytes(), &mut data);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_series_rejects_bad_price() {
        let csv = "date,SP500\n2024-01-01,n/a\n";
        let mut data = MarketData::new();

        let result = read_series(csv.as_bytes(), &mut data);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_series_rejects_single_column() {
        let csv = "date\n2024-01-01\n";
        let mut data = MarketData::new();

        let result = read_series(csv.as_bytes(), &mut data);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_entity_across_files_merges() {
        let mut data = MarketData::new();
        read_series(
            "date,SP500\n2024-01-03,103.0\n".as_bytes(),
            &mut data,
        )
        .unwrap();
        read_series(
            "date,SP500\n2024-01-01,100.0\n".as_bytes(),
            &mut data,
        )
        .unwrap();
        data.sort_series();

        let series = data.series("SP500").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date("2024-01-01"));
        assert_eq!(series[1].date, date("2024-01-03"));
    }

    #[test]
    fn test_load_market_data_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sp500.csv"),
            "date,SP500\n2024-01-01,100.0\n2024-01-02,130.0\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("dax.csv"),
            "date,DAX\n2024-01-01,50.0\n",
        )
        .unwrap();
        // Non-CSV files are ignored
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let data = load_market_data(dir.path()).unwrap();
        assert_eq!(data.entity_count(), 2);
        assert_eq!(data.point_count(), 3);
        assert!(data.series("SP500").is_some());
        assert!(data.series("DAX").is_some());
    }

    #[test]
    fn test_load_market_data_sorts_unordered_rows() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sp500.csv"),
            "date,SP500\n2024-01-03,130.0\n2024-01-01,100.0\n2024-01-02,110.0\n",
        )
        .unwrap();

        let data = load_market_data(dir.path()).unwrap();
        let series = data.series("SP500").unwrap();
        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]
        );
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_market_data(dir.path()).is_err());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_market_data(&missing).is_err());
    }
}
