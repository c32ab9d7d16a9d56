use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dated price sample for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Per-entity price series, keyed by entity id.
///
/// Entities iterate in ascending id order so that runs over the same input
/// produce identically ordered output. Within an entity the series is kept
/// in ascending date order; `sort_series` reestablishes that invariant after
/// loading, and the detector relies on it when windowing.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    series: BTreeMap<String, Vec<PricePoint>>,
}

impl MarketData {
    pub fn new() -> Self {
        Self {
            series: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, entity_id: &str, point: PricePoint) {
        self.series
            .entry(entity_id.to_string())
            .or_default()
            .push(point);
    }

    /// Sort every series chronologically. Ties keep insertion order.
    pub fn sort_series(&mut self) {
        for points in self.series.values_mut() {
            points.sort_by_key(|point| point.date);
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &[PricePoint])> {
        self.series
            .iter()
            .map(|(entity_id, points)| (entity_id.as_str(), points.as_slice()))
    }

    pub fn series(&self, entity_id: &str) -> Option<&[PricePoint]> {
        self.series.get(entity_id).map(|points| points.as_slice())
    }

    pub fn entity_count(&self) -> usize {
        self.series.len()
    }

    pub fn point_count(&self) -> usize {
        self.series.values().map(|points| points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A flagged price movement: one (entity, date) whose change versus its
/// lookback baseline exceeded the resolved threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub entity_id: String,
    pub check_type: String,
    pub date: NaiveDate,
    pub previous_value: f64,
    pub current_value: f64,
    pub change_percent: f64,
    pub threshold: f64,
}

impl Violation {
    pub fn new(
        entity_id: String,
        check_type: String,
        date: NaiveDate,
        previous_value: f64,
        current_value: f64,
        change_percent: f64,
        threshold: f64,
    ) -> Self {
        Self {
            entity_id,
            check_type,
            date,
            previous_value: round2(previous_value),
            current_value: round2(current_value),
            change_percent: round2(change_percent),
            threshold,
        }
    }
}

/// Round to two decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
