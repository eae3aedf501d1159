//! Feature store — backing source for stationary platforms
//!
//! Feature records are fixed sensor carriers with a static site. They do not
//! know their own sensing mode; the taxonomy partition a query names decides
//! whether matching features surface as insitu or remote platforms. The
//! `insitu` column exists only to keep the two stationary partitions
//! disjoint when listing.

use crate::db::{parse_translations, SourceAdapter};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::query::Query;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;

/// Stationary backing record, read-only from this crate's perspective
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub pkid: i64,
    pub domain_id: String,
    pub name: String,
    pub translations: BTreeMap<String, String>,
    pub description: Option<String>,
    pub geometry: Option<Geometry>,
}

/// SQLite-backed feature source
#[derive(Debug, Clone)]
pub struct FeatureStore {
    pool: Pool<Sqlite>,
}

impl FeatureStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &SqliteRow) -> FeatureRecord {
        FeatureRecord {
            pkid: row.get("pkid"),
            domain_id: row.get("domain_id"),
            name: row.get("name"),
            translations: parse_translations(row.get("translations")),
            description: row.get("description"),
            geometry: Geometry::from_columns(
                row.get("longitude"),
                row.get("latitude"),
                row.get("altitude"),
            ),
        }
    }

    /// WHERE clause for the query's sensing-mode flags. Listing with neither
    /// flag matches nothing; get-by-id ignores sensing flags entirely.
    fn sensing_clause(query: &Query) -> Option<&'static str> {
        match (
            query.include_insitu_platform_types(),
            query.include_remote_platform_types(),
        ) {
            (true, true) => Some(""),
            (true, false) => Some(" WHERE insitu = 1"),
            (false, true) => Some(" WHERE insitu = 0"),
            (false, false) => None,
        }
    }
}

const SELECT_FEATURE: &str =
    "SELECT pkid, domain_id, name, translations, description, longitude, latitude, altitude \
     FROM features";

#[async_trait]
impl SourceAdapter for FeatureStore {
    type Record = FeatureRecord;

    async fn get_instance(&self, raw_id: i64, _query: &Query) -> Result<Option<FeatureRecord>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&format!("{SELECT_FEATURE} WHERE pkid = ?"))
            .bind(raw_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn get_all_instances(&self, query: &Query) -> Result<Vec<FeatureRecord>> {
        let Some(clause) = Self::sensing_clause(query) else {
            return Ok(Vec::new());
        };
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&format!("{SELECT_FEATURE}{clause} ORDER BY pkid"))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.iter().map(Self::record_from_row).collect())
    }

    async fn has_instance(&self, raw_id: i64, _query: &Query) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM features WHERE pkid = ?)")
            .bind(raw_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}
