//! Chart Builder
//!
//! Shapes fetched measurement rows into a render-ready line chart
//! description for a single identifier. Pure and infallible: no match
//! produces an empty descriptor, never an error.

use chrono::NaiveDate;
use serde::Serialize;

use crate::store::MeasurementRow;

/// One point of the chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub day: NaiveDate,
    pub avg_weight: f64,
}

/// In-memory, render-ready representation of one line chart
///
/// Derived, read-only view scoped to one identifier; discarded after
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl ChartDescriptor {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the line chart for one identifier
///
/// Filters `rows` to exact, case-sensitive matches on `identifier`. The
/// fetcher already orders rows by day ascending; that order is preserved,
/// not re-sorted.
pub fn build(rows: &[MeasurementRow], identifier: &str) -> ChartDescriptor {
    let points = rows
        .iter()
        .filter(|r| r.identifier == identifier)
        .map(|r| ChartPoint {
            day: r.day,
            avg_weight: r.avg_weight,
        })
        .collect();

    ChartDescriptor {
        title: format!("Weight over Time for {}", identifier),
        points,
    }
}
