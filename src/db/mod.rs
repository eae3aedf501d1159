//! SQLite-backed stores
//!
//! Two disjoint backing sources hold platform records: the `features` table
//! (stationary carriers) and the `platforms` table (mobile carriers). Both
//! stores implement the same [`SourceAdapter`] capability set. Dataset
//! descriptors and per-type value tables live alongside them.
//!
//! Every store method checks out one pooled connection for its full duration;
//! the checkout is released on every exit path when the guard drops.

pub mod datasets;
pub mod features;
pub mod platforms;

use crate::error::Result;
use crate::query::Query;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Capability set shared by both backing sources
#[async_trait]
pub trait SourceAdapter {
    type Record;

    async fn get_instance(&self, raw_id: i64, query: &Query) -> Result<Option<Self::Record>>;

    async fn get_all_instances(&self, query: &Query) -> Result<Vec<Self::Record>>;

    async fn has_instance(&self, raw_id: i64, query: &Query) -> Result<bool>;
}

/// Open a connection pool to the backing store
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    info!("Connected to database: {}", database_url);
    Ok(pool)
}

/// Create the backing tables if missing
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS features (
            pkid INTEGER PRIMARY KEY,
            domain_id TEXT NOT NULL,
            name TEXT NOT NULL,
            translations TEXT,
            description TEXT,
            insitu INTEGER NOT NULL DEFAULT 1,
            longitude REAL,
            latitude REAL,
            altitude REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS platforms (
            pkid INTEGER PRIMARY KEY,
            domain_id TEXT NOT NULL,
            name TEXT NOT NULL,
            translations TEXT,
            description TEXT,
            insitu INTEGER NOT NULL DEFAULT 1,
            longitude REAL,
            latitude REAL,
            altitude REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS datasets (
            id TEXT PRIMARY KEY,
            platform_id TEXT NOT NULL,
            name TEXT NOT NULL,
            dataset_type TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    for table in ["measurement_values", "count_values", "text_values"] {
        let value_column = match table {
            "measurement_values" => "value REAL",
            "count_values" => "value INTEGER",
            _ => "value TEXT",
        };
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                dataset_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                {value_column},
                longitude REAL,
                latitude REAL,
                altitude REAL
            )
            "#
        ))
        .execute(pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_dataset_ts ON {table} (dataset_id, timestamp)"
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Decode a translations JSON column into a locale → label map
pub(crate) fn parse_translations(
    raw: Option<String>,
) -> std::collections::BTreeMap<String, String> {
    raw.and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}
