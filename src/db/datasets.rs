//! Dataset aggregator — collaborator supplying a platform's dataset list
//!
//! The expanded platform view joins in the datasets owned by the platform.
//! The aggregator is a trait so the location resolver can be exercised with
//! synthetic dataset sets; the production implementation reads the
//! `datasets` table keyed by the encoded platform identifier.

use crate::error::Result;
use crate::model::DatasetRef;
use crate::query::Query;
use crate::readers::DatasetType;
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

/// Storage-side dataset row
#[derive(Debug, Clone)]
pub struct DatasetEntity {
    pub id: String,
    pub name: String,
    pub dataset_type: DatasetType,
    pub platform_id: String,
}

/// Supplies a platform's dataset list and dataset entities
#[async_trait]
pub trait DatasetAggregator: Send + Sync {
    /// Condensed dataset refs matching the query; a platform scope narrows
    /// the result to that platform's datasets.
    async fn get_all_condensed(&self, query: &Query) -> Result<Vec<DatasetRef>>;

    async fn get_instance_entity(&self, id: &str, query: &Query)
        -> Result<Option<DatasetEntity>>;
}

/// SQLite-backed dataset aggregator
#[derive(Debug, Clone)]
pub struct DatasetStore {
    pool: Pool<Sqlite>,
}

impl DatasetStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetAggregator for DatasetStore {
    async fn get_all_condensed(&self, query: &Query) -> Result<Vec<DatasetRef>> {
        let mut conn = self.pool.acquire().await?;
        let rows = match query.platform_scope() {
            Some(platform_id) => {
                sqlx::query(
                    "SELECT id, dataset_type FROM datasets WHERE platform_id = ? ORDER BY id",
                )
                .bind(platform_id.to_string())
                .fetch_all(&mut *conn)
                .await?
            }
            None => {
                sqlx::query("SELECT id, dataset_type FROM datasets ORDER BY id")
                    .fetch_all(&mut *conn)
                    .await?
            }
        };
        Ok(rows
            .iter()
            .map(|row| DatasetRef {
                id: row.get("id"),
                dataset_type: DatasetType::from_name(row.get::<String, _>("dataset_type").as_str()),
            })
            .collect())
    }

    async fn get_instance_entity(
        &self,
        id: &str,
        _query: &Query,
    ) -> Result<Option<DatasetEntity>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query("SELECT id, name, dataset_type, platform_id FROM datasets WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(|row| DatasetEntity {
            id: row.get("id"),
            name: row.get("name"),
            dataset_type: DatasetType::from_name(row.get::<String, _>("dataset_type").as_str()),
            platform_id: row.get("platform_id"),
        }))
    }
}
