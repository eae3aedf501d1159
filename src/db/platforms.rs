//! Platform store — backing source for mobile platforms
//!
//! Mobile platform records already carry the unified shape (minus datasets),
//! including their sensing mode. Listing filters on the sensing flags of the
//! partition query; fetching by id returns the record as stored.
//!
//! The store also backs the search operation with a label match against the
//! record name and its translations.

use crate::db::{parse_translations, SourceAdapter};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::platform_id::SensingMode;
use crate::query::Query;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use tracing::debug;

/// Mobile backing record in its native shape
#[derive(Debug, Clone)]
pub struct PlatformRecord {
    pub pkid: i64,
    pub domain_id: String,
    pub name: String,
    pub translations: BTreeMap<String, String>,
    pub description: Option<String>,
    pub sensing_mode: SensingMode,
    pub geometry: Option<Geometry>,
}

/// SQLite-backed platform source
#[derive(Debug, Clone)]
pub struct PlatformStore {
    pool: Pool<Sqlite>,
}

impl PlatformStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &SqliteRow) -> PlatformRecord {
        let insitu: bool = row.get("insitu");
        PlatformRecord {
            pkid: row.get("pkid"),
            domain_id: row.get("domain_id"),
            name: row.get("name"),
            translations: parse_translations(row.get("translations")),
            description: row.get("description"),
            sensing_mode: if insitu {
                SensingMode::Insitu
            } else {
                SensingMode::Remote
            },
            geometry: Geometry::from_columns(
                row.get("longitude"),
                row.get("latitude"),
                row.get("altitude"),
            ),
        }
    }

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

    /// Label search over name and translations. The search term comes from
    /// the query's `search` parameter; no term matches nothing.
    pub async fn find(&self, query: &Query) -> Result<Vec<PlatformRecord>> {
        let Some(term) = query.param("search").filter(|t| !t.is_empty()) else {
            debug!("Platform search without a search term matches nothing");
            return Ok(Vec::new());
        };
        let pattern = format!("%{}%", term);
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&format!(
            "{SELECT_PLATFORM} WHERE name LIKE ? OR translations LIKE ? ORDER BY pkid"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.iter().map(Self::record_from_row).collect())
    }
}

const SELECT_PLATFORM: &str =
    "SELECT pkid, domain_id, name, translations, description, insitu, longitude, latitude, altitude \
     FROM platforms";

#[async_trait]
impl SourceAdapter for PlatformStore {
    type Record = PlatformRecord;

    async fn get_instance(&self, raw_id: i64, _query: &Query) -> Result<Option<PlatformRecord>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&format!("{SELECT_PLATFORM} WHERE pkid = ?"))
            .bind(raw_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn get_all_instances(&self, query: &Query) -> Result<Vec<PlatformRecord>> {
        let Some(clause) = Self::sensing_clause(query) else {
            return Ok(Vec::new());
        };
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&format!("{SELECT_PLATFORM}{clause} ORDER BY pkid"))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.iter().map(Self::record_from_row).collect())
    }

    async fn has_instance(&self, raw_id: i64, _query: &Query) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM platforms WHERE pkid = ?)")
                .bind(raw_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }
}
