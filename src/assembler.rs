//! Platform view assembly
//!
//! The assembler is the heart of the read path: it partitions a query along
//! the taxonomy axes, fetches from the matching backing source, normalizes
//! feature records into the unified platform shape, and projects entities
//! into condensed or expanded views. Building the expanded view joins in the
//! platform's dataset list and, when the record has no static geometry,
//! derives one from the latest dataset observation.

use crate::access::OutputAssembler;
use crate::config::Config;
use crate::db::datasets::{DatasetAggregator, DatasetStore};
use crate::db::features::{FeatureRecord, FeatureStore};
use crate::db::platforms::{PlatformRecord, PlatformStore};
use crate::db::SourceAdapter;
use crate::error::{Error, Result};
use crate::location::LastLocationResolver;
use crate::model::{
    CondensedPlatform, ExpandedPlatform, HasLabel, PlatformEntity, SearchResult, UrlHelper,
};
use crate::platform_id::{Mobility, PlatformId, SensingMode};
use crate::query::{Partition, Query};
use crate::readers::{SqlValueReaderFactory, ValueReaderFactory};
use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

/// Convert a feature-backed record into the unified platform shape, tagging
/// it with the sensing mode its partition names. Pure and total; a missing
/// geometry stays missing.
pub fn to_platform(record: FeatureRecord, sensing_mode: SensingMode) -> PlatformEntity {
    PlatformEntity {
        id: PlatformId::new(Mobility::Stationary, sensing_mode, record.pkid),
        domain_id: record.domain_id,
        name: record.name,
        translations: record.translations,
        description: record.description,
        geometry: record.geometry,
    }
}

fn from_mobile(record: PlatformRecord) -> PlatformEntity {
    PlatformEntity {
        id: PlatformId::new(Mobility::Mobile, record.sensing_mode, record.pkid),
        domain_id: record.domain_id,
        name: record.name,
        translations: record.translations,
        description: record.description,
        geometry: record.geometry,
    }
}

/// Resolves platforms across both backing sources and assembles output views
pub struct PlatformAssembler {
    features: FeatureStore,
    platforms: PlatformStore,
    datasets: Arc<dyn DatasetAggregator>,
    readers: Arc<dyn ValueReaderFactory>,
    urls: UrlHelper,
    default_locale: Option<String>,
}

impl PlatformAssembler {
    /// Production wiring: all collaborators backed by the given pool
    pub fn new(pool: Pool<Sqlite>, urls: UrlHelper) -> Self {
        let datasets = Arc::new(DatasetStore::new(pool.clone()));
        let readers = Arc::new(SqlValueReaderFactory::new(pool.clone()));
        Self::with_collaborators(pool, urls, datasets, readers)
    }

    /// Wiring with injected dataset aggregator and value-reader factory
    pub fn with_collaborators(
        pool: Pool<Sqlite>,
        urls: UrlHelper,
        datasets: Arc<dyn DatasetAggregator>,
        readers: Arc<dyn ValueReaderFactory>,
    ) -> Self {
        Self {
            features: FeatureStore::new(pool.clone()),
            platforms: PlatformStore::new(pool),
            datasets,
            readers,
            urls,
            default_locale: None,
        }
    }

    /// Locale used for label selection when a query names none
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Connect to the configured store and wire up production collaborators
    pub async fn from_config(config: &Config) -> Result<Self> {
        let pool = crate::db::connect(&config.database_url).await?;
        crate::db::init_schema(&pool).await?;
        let mut assembler = Self::new(pool, UrlHelper::new(config.external_url.clone()));
        if let Some(locale) = &config.default_locale {
            assembler = assembler.with_default_locale(locale.clone());
        }
        Ok(assembler)
    }

    fn locale<'a>(&'a self, query: &'a Query) -> Option<&'a str> {
        query.locale().or(self.default_locale.as_deref())
    }

    fn condensed(&self, entity: &PlatformEntity, query: &Query) -> CondensedPlatform {
        CondensedPlatform {
            id: entity.id.to_string(),
            label: entity.label_from(self.locale(query)),
            domain_id: entity.domain_id.clone(),
            href_base: self.urls.platforms_href_base(query.href_base()),
        }
    }

    async fn expanded(&self, entity: PlatformEntity, query: &Query) -> Result<ExpandedPlatform> {
        let condensed = self.condensed(&entity, query);
        // One inbound query, one fresh derivation: platform-type filters are
        // stripped and the view's own id becomes the dataset scope.
        let scoped = query
            .without_platform_type_filters()
            .scoped_to_platform(entity.id);
        let datasets = self.datasets.get_all_condensed(&scoped).await?;

        let geometry = match entity.geometry {
            Some(geometry) => Some(geometry),
            None => {
                let resolver =
                    LastLocationResolver::new(self.datasets.as_ref(), self.readers.as_ref());
                resolver.resolve(&datasets, &scoped).await
            }
        };

        Ok(ExpandedPlatform {
            condensed,
            datasets,
            geometry,
        })
    }

    /// Fetch the unified record behind a decoded identifier
    async fn fetch_entity(&self, id: PlatformId, query: &Query) -> Result<PlatformEntity> {
        match id.mobility {
            Mobility::Stationary => {
                let feature = self
                    .features
                    .get_instance(id.raw_id, query)
                    .await?
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                Ok(to_platform(feature, id.sensing_mode))
            }
            Mobility::Mobile => {
                let record = self
                    .platforms
                    .get_instance(id.raw_id, query)
                    .await?
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                Ok(from_mobile(record))
            }
        }
    }

    /// Union over the selected partitions, in partition order. Partitions are
    /// disjoint by construction, so no duplicate suppression is needed.
    async fn get_all_entities(&self, query: &Query) -> Result<Vec<PlatformEntity>> {
        let mut entities = Vec::new();
        for partition in Partition::select(query) {
            let scoped = partition.scoped_query(query);
            match partition.mobility {
                Mobility::Stationary => {
                    for feature in self.features.get_all_instances(&scoped).await? {
                        entities.push(to_platform(feature, partition.sensing_mode));
                    }
                }
                Mobility::Mobile => {
                    for record in self.platforms.get_all_instances(&scoped).await? {
                        entities.push(from_mobile(record));
                    }
                }
            }
        }
        Ok(entities)
    }
}

#[async_trait]
impl OutputAssembler for PlatformAssembler {
    type Condensed = CondensedPlatform;
    type Expanded = ExpandedPlatform;

    async fn get_all_condensed(&self, query: &Query) -> Result<Vec<CondensedPlatform>> {
        let entities = self.get_all_entities(query).await?;
        Ok(entities
            .iter()
            .map(|entity| self.condensed(entity, query))
            .collect())
    }

    async fn get_all_expanded(&self, query: &Query) -> Result<Vec<ExpandedPlatform>> {
        let mut results = Vec::new();
        for entity in self.get_all_entities(query).await? {
            results.push(self.expanded(entity, query).await?);
        }
        Ok(results)
    }

    async fn get_instance(&self, id: &str, query: &Query) -> Result<ExpandedPlatform> {
        let id: PlatformId = id.parse()?;
        let entity = self.fetch_entity(id, query).await?;
        self.expanded(entity, query).await
    }

    async fn exists(&self, id: &str, query: &Query) -> Result<bool> {
        let id: PlatformId = id.parse()?;
        match id.mobility {
            Mobility::Stationary => self.features.has_instance(id.raw_id, query).await,
            Mobility::Mobile => self.platforms.has_instance(id.raw_id, query).await,
        }
    }

    async fn search(&self, query: &Query) -> Result<Vec<SearchResult>> {
        let found = self.platforms.find(query).await?;
        Ok(found
            .into_iter()
            .map(|record| {
                let entity = from_mobile(record);
                SearchResult {
                    id: entity.id.to_string(),
                    label: entity.label_from(self.locale(query)),
                    href_base: self.urls.platforms_href_base(query.href_base()),
                }
            })
            .collect())
    }
}
