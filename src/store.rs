//! Measurement Store
//!
//! Data fetcher for the weight measurement store. Issues the fixed
//! GROUP BY/AVG aggregation query against MariaDB/MySQL and returns
//! one row per (identifier, day). No caching; every invocation
//! re-queries the store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// One aggregated measurement row: daily average weight for an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Key distinguishing one measured entity/device from another
    pub identifier: String,
    /// Calendar day the average covers
    pub day: NaiveDate,
    /// Average weight over that day
    pub avg_weight: f64,
}

/// Store error taxonomy
///
/// Both variants propagate unrecovered to the caller; there is no local
/// retry or fallback data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed result, e.g. unexpected column shape
    #[error("Query error: {0}")]
    Query(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => {
                // SQLSTATE 28000: access denied; 08xxx: connection exceptions
                match db.code().as_deref() {
                    Some(code) if code.starts_with("08") || code == "28000" => {
                        StoreError::Connection(db.to_string())
                    }
                    _ => StoreError::Query(db.to_string()),
                }
            }
            sqlx::Error::RowNotFound
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_) => StoreError::Query(e.to_string()),
            _ => StoreError::Connection(e.to_string()),
        }
    }
}

/// Source of aggregated measurement rows
///
/// The seam between the dashboard and the store. The production
/// implementation is [`MySqlStore`]; tests inject an in-memory source.
#[async_trait]
pub trait MeasurementSource: Send + Sync {
    /// Fetch all daily averages, ordered by day ascending
    async fn fetch_daily_averages(&self) -> StoreResult<Vec<MeasurementRow>>;
}

/// The fixed aggregation query. AVG() yields DECIMAL on MySQL, so the
/// result is cast to DOUBLE to keep the column decodable as f64.
const DAILY_AVERAGES_SQL: &str = "\
    SELECT identifier, DATE(timestamp) AS day, CAST(AVG(weight) AS DOUBLE) AS avg_weight \
    FROM weight_measurements \
    GROUP BY identifier, day \
    ORDER BY day";

/// MySQL/MariaDB-backed measurement source
///
/// Holds a connection pool built from injected configuration. Connections
/// are acquired per query and released unconditionally, including on query
/// failure.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect to the measurement store
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url())
            .await?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            "Connected to measurement store"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used when the caller manages the pool)
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeasurementSource for MySqlStore {
    async fn fetch_daily_averages(&self) -> StoreResult<Vec<MeasurementRow>> {
        let records = sqlx::query(DAILY_AVERAGES_SQL).fetch_all(&self.pool).await?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(MeasurementRow {
                identifier: record.try_get("identifier").map_err(StoreError::from)?,
                day: record.try_get("day").map_err(StoreError::from)?,
                avg_weight: record.try_get("avg_weight").map_err(StoreError::from)?,
            });
        }

        tracing::debug!(row_count = rows.len(), "Fetched daily averages");
        Ok(rows)
    }
}
