//! Dataset types and last-value readers
//!
//! Dataset time-series values live in per-type tables, so reading the latest
//! value of a dataset is dispatched on its [`DatasetType`]. The type set is
//! closed; anything else parses into the `Unknown` branch and surfaces as
//! `UnsupportedDatasetType` when a reader is requested, which the location
//! resolver treats as a skippable condition rather than a failure.

use crate::db::datasets::DatasetEntity;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::model::SamplingValue;
use crate::query::Query;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use sqlx::{Pool, Row, Sqlite};
use std::fmt;

/// Closed set of dataset types with per-type value storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetType {
    Measurement,
    Count,
    Text,
    /// Type with no registered value reader; kept verbatim for diagnostics
    Unknown(String),
}

impl DatasetType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "measurement" => DatasetType::Measurement,
            "count" => DatasetType::Count,
            "text" => DatasetType::Text,
            other => DatasetType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DatasetType::Measurement => "measurement",
            DatasetType::Count => "count",
            DatasetType::Text => "text",
            DatasetType::Unknown(name) => name,
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DatasetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Reads the latest recorded value of one dataset
#[async_trait]
pub trait ValueReader: Send + Sync {
    async fn last_value(
        &self,
        dataset: &DatasetEntity,
        query: &Query,
    ) -> Result<Option<SamplingValue>>;
}

/// Resolves a [`ValueReader`] for a dataset type
pub trait ValueReaderFactory: Send + Sync {
    /// Fails with `UnsupportedDatasetType` for the `Unknown` branch
    fn create(&self, dataset_type: &DatasetType) -> Result<Box<dyn ValueReader>>;
}

/// Production factory backed by the per-type SQLite value tables
#[derive(Debug, Clone)]
pub struct SqlValueReaderFactory {
    pool: Pool<Sqlite>,
}

impl SqlValueReaderFactory {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

impl ValueReaderFactory for SqlValueReaderFactory {
    fn create(&self, dataset_type: &DatasetType) -> Result<Box<dyn ValueReader>> {
        let table = match dataset_type {
            DatasetType::Measurement => "measurement_values",
            DatasetType::Count => "count_values",
            DatasetType::Text => "text_values",
            DatasetType::Unknown(name) => {
                return Err(Error::UnsupportedDatasetType(name.clone()))
            }
        };
        Ok(Box::new(SqlValueReader {
            pool: self.pool.clone(),
            table,
        }))
    }
}

/// Last-value reader over one value table. The tables share the timestamp
/// and coordinate columns; only the value column differs, and it is not
/// needed for location resolution.
struct SqlValueReader {
    pool: Pool<Sqlite>,
    table: &'static str,
}

#[async_trait]
impl ValueReader for SqlValueReader {
    async fn last_value(
        &self,
        dataset: &DatasetEntity,
        _query: &Query,
    ) -> Result<Option<SamplingValue>> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "SELECT timestamp, longitude, latitude, altitude \
             FROM {} WHERE dataset_id = ? \
             ORDER BY timestamp DESC LIMIT 1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(&dataset.id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|row| SamplingValue {
            timestamp: row.get("timestamp"),
            geometry: Geometry::from_columns(
                row.get("longitude"),
                row.get("latitude"),
                row.get("altitude"),
            ),
        }))
    }
}
