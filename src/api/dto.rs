//! Data Transfer Objects
//!
//! Response types for the API endpoints, serialized to JSON.

use serde::Serialize;

use crate::chart::ChartDescriptor;

/// Chart payload for the dashboard
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    /// Chart title, includes the selected identifier
    pub title: String,
    /// X-axis labels (ISO dates, day ascending)
    pub labels: Vec<String>,
    /// Y-axis values (daily average weight)
    pub data: Vec<f64>,
}

impl From<ChartDescriptor> for ChartResponse {
    fn from(chart: ChartDescriptor) -> Self {
        Self {
            title: chart.title,
            labels: chart
                .points
                .iter()
                .map(|p| p.day.format("%Y-%m-%d").to_string())
                .collect(),
            data: chart.points.iter().map(|p| p.avg_weight).collect(),
        }
    }
}

/// Identifier list response
#[derive(Debug, Serialize)]
pub struct IdentifierListResponse {
    /// Distinct identifiers present in the store, sorted
    pub identifiers: Vec<String>,
    /// Total count
    pub total: usize,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Measurement store status
    pub store: String,
    /// Active push-channel connections
    pub push_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
