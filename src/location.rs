//! Last-sampling-geometry resolution
//!
//! A platform without a static site still has a location: wherever its most
//! recent observation was taken. The resolver scans the platform's datasets
//! in order, reads each one's latest value through a type-dispatched reader,
//! and keeps the value with the greatest timestamp. Resolution is
//! best-effort — a dataset whose type has no reader, whose entity is gone,
//! or whose store read fails is logged and skipped, never fatal.

use crate::db::datasets::DatasetAggregator;
use crate::geometry::Geometry;
use crate::model::{DatasetRef, SamplingValue};
use crate::query::Query;
use crate::readers::ValueReaderFactory;
use tracing::{debug, warn};

/// Derives a platform location from its datasets' latest values
pub struct LastLocationResolver<'a> {
    datasets: &'a dyn DatasetAggregator,
    readers: &'a dyn ValueReaderFactory,
}

impl<'a> LastLocationResolver<'a> {
    pub fn new(datasets: &'a dyn DatasetAggregator, readers: &'a dyn ValueReaderFactory) -> Self {
        Self { datasets, readers }
    }

    /// Geometry of the latest resolvable value across `datasets`, or `None`
    /// if nothing resolves or the winning value carries no geometry.
    pub async fn resolve(&self, datasets: &[DatasetRef], query: &Query) -> Option<Geometry> {
        let mut current_last: Option<SamplingValue> = None;
        for dataset in datasets {
            let reader = match self.readers.create(&dataset.dataset_type) {
                Ok(reader) => reader,
                Err(e) => {
                    warn!(
                        "Couldn't create value reader to determine last value of dataset '{}': {}",
                        dataset.id, e
                    );
                    continue;
                }
            };
            let entity = match self.datasets.get_instance_entity(&dataset.id, query).await {
                Ok(Some(entity)) => entity,
                Ok(None) => {
                    debug!("Dataset '{}' has no backing entity", dataset.id);
                    continue;
                }
                Err(e) => {
                    warn!("Couldn't resolve dataset entity '{}': {}", dataset.id, e);
                    continue;
                }
            };
            let value = match reader.last_value(&entity, query).await {
                Ok(value) => value,
                Err(e) => {
                    warn!("Couldn't read last value of dataset '{}': {}", dataset.id, e);
                    continue;
                }
            };
            current_last = later_value(current_last, value);
        }

        current_last.and_then(|value| value.geometry)
    }
}

/// Keep the value with the strictly greater timestamp; on an exact tie the
/// earlier-encountered value wins, keeping the scan deterministic.
fn later_value(
    current: Option<SamplingValue>,
    candidate: Option<SamplingValue>,
) -> Option<SamplingValue> {
    match (current, candidate) {
        (None, candidate) => candidate,
        (current, None) => current,
        (Some(current), Some(candidate)) => {
            if candidate.timestamp > current.timestamp {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::datasets::DatasetEntity;
    use crate::error::{Error, Result};
    use crate::readers::{DatasetType, ValueReader};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;

    fn ts(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn dataset(id: &str, dataset_type: DatasetType) -> DatasetRef {
        DatasetRef {
            id: id.to_string(),
            dataset_type,
        }
    }

    /// Aggregator that knows every dataset it is asked about
    struct EchoAggregator;

    #[async_trait]
    impl DatasetAggregator for EchoAggregator {
        async fn get_all_condensed(&self, _query: &Query) -> Result<Vec<DatasetRef>> {
            Ok(Vec::new())
        }

        async fn get_instance_entity(
            &self,
            id: &str,
            _query: &Query,
        ) -> Result<Option<DatasetEntity>> {
            Ok(Some(DatasetEntity {
                id: id.to_string(),
                name: id.to_string(),
                dataset_type: DatasetType::Measurement,
                platform_id: "mobile-insitu-1".to_string(),
            }))
        }
    }

    /// Factory serving canned last values keyed by dataset id
    struct FixedFactory {
        values: BTreeMap<String, Option<SamplingValue>>,
        failing: Vec<String>,
    }

    impl FixedFactory {
        fn new() -> Self {
            Self {
                values: BTreeMap::new(),
                failing: Vec::new(),
            }
        }

        fn with_value(mut self, id: &str, value: Option<SamplingValue>) -> Self {
            self.values.insert(id.to_string(), value);
            self
        }

        fn with_failing(mut self, id: &str) -> Self {
            self.failing.push(id.to_string());
            self
        }
    }

    impl ValueReaderFactory for FixedFactory {
        fn create(&self, dataset_type: &DatasetType) -> Result<Box<dyn ValueReader>> {
            if let DatasetType::Unknown(name) = dataset_type {
                return Err(Error::UnsupportedDatasetType(name.clone()));
            }
            Ok(Box::new(FixedReader {
                values: self.values.clone(),
                failing: self.failing.clone(),
            }))
        }
    }

    struct FixedReader {
        values: BTreeMap<String, Option<SamplingValue>>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl ValueReader for FixedReader {
        async fn last_value(
            &self,
            dataset: &DatasetEntity,
            _query: &Query,
        ) -> Result<Option<SamplingValue>> {
            if self.failing.contains(&dataset.id) {
                return Err(Error::Internal("reader failure".to_string()));
            }
            Ok(self.values.get(&dataset.id).cloned().flatten())
        }
    }

    fn value(seconds: i64, longitude: f64) -> Option<SamplingValue> {
        Some(SamplingValue {
            timestamp: ts(seconds),
            geometry: Some(Geometry::new(longitude, 52.0)),
        })
    }

    #[tokio::test]
    async fn picks_the_latest_value_across_datasets() {
        let factory = FixedFactory::new()
            .with_value("d1", value(100, 1.0))
            .with_value("d2", value(300, 2.0))
            .with_value("d3", value(200, 3.0));
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Measurement),
            dataset("d2", DatasetType::Count),
            dataset("d3", DatasetType::Text),
        ];

        let geometry = resolver.resolve(&refs, &Query::new()).await;
        assert_eq!(geometry, Some(Geometry::new(2.0, 52.0)));
    }

    #[tokio::test]
    async fn exact_timestamp_tie_keeps_the_earlier_dataset() {
        let factory = FixedFactory::new()
            .with_value("d1", value(500, 1.0))
            .with_value("d2", value(500, 2.0));
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Measurement),
            dataset("d2", DatasetType::Measurement),
        ];

        let geometry = resolver.resolve(&refs, &Query::new()).await;
        assert_eq!(geometry, Some(Geometry::new(1.0, 52.0)));
    }

    #[tokio::test]
    async fn unsupported_dataset_type_is_skipped() {
        let factory = FixedFactory::new().with_value("d2", value(100, 2.0));
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Unknown("trajectory".to_string())),
            dataset("d2", DatasetType::Measurement),
        ];

        let geometry = resolver.resolve(&refs, &Query::new()).await;
        assert_eq!(geometry, Some(Geometry::new(2.0, 52.0)));
    }

    #[tokio::test]
    async fn reader_failure_is_skipped_not_fatal() {
        let factory = FixedFactory::new()
            .with_failing("d1")
            .with_value("d2", value(100, 2.0));
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Measurement),
            dataset("d2", DatasetType::Measurement),
        ];

        let geometry = resolver.resolve(&refs, &Query::new()).await;
        assert_eq!(geometry, Some(Geometry::new(2.0, 52.0)));
    }

    #[tokio::test]
    async fn nothing_resolvable_yields_absent() {
        let factory = FixedFactory::new().with_failing("d1");
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Measurement),
            dataset("d2", DatasetType::Unknown("trajectory".to_string())),
        ];

        assert_eq!(resolver.resolve(&refs, &Query::new()).await, None);
        assert_eq!(resolver.resolve(&[], &Query::new()).await, None);
    }

    #[tokio::test]
    async fn winning_value_without_geometry_yields_absent() {
        let no_geometry = Some(SamplingValue {
            timestamp: ts(900),
            geometry: None,
        });
        let factory = FixedFactory::new()
            .with_value("d1", value(100, 1.0))
            .with_value("d2", no_geometry);
        let resolver = LastLocationResolver::new(&EchoAggregator, &factory);
        let refs = [
            dataset("d1", DatasetType::Measurement),
            dataset("d2", DatasetType::Measurement),
        ];

        assert_eq!(resolver.resolve(&refs, &Query::new()).await, None);
    }
}
