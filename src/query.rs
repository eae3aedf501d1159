//! Immutable query values and taxonomy partitioning
//!
//! A [`Query`] carries the request-scoped read parameters: platform-type
//! filter tags, locale, href-base override, an optional platform scope, and
//! free-form extra parameters. Queries are values — every derivation
//! (`without_platform_type_filters`, `scoped_to_platform`, ...) returns a new
//! `Query` and leaves the original untouched. One inbound query seeds up to
//! four divergent partition queries plus a dataset-scoped query within a
//! single expanded-view build, so sharing a mutable builder would be wrong.
//!
//! [`Partition`] is one cell of the mobility × sensing-mode cross product.
//! `Partition::select` turns a query's filter flags into the ordered list of
//! partitions to fetch.

use crate::platform_id::{Mobility, PlatformId, SensingMode};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable request-scoped read parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    platform_type_filters: BTreeSet<String>,
    locale: Option<String>,
    href_base: Option<String>,
    platform_scope: Option<PlatformId>,
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_href_base(mut self, href_base: impl Into<String>) -> Self {
        self.href_base = Some(href_base.into());
        self
    }

    /// Replace the platform-type filter tags wholesale
    pub fn with_platform_types<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform_type_filters = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Derive a query with all platform-type filter tags removed
    pub fn without_platform_type_filters(&self) -> Self {
        let mut derived = self.clone();
        derived.platform_type_filters.clear();
        derived
    }

    /// Derive a query scoped to a single platform's resources
    pub fn scoped_to_platform(&self, id: PlatformId) -> Self {
        let mut derived = self.clone();
        derived.platform_scope = Some(id);
        derived
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn href_base(&self) -> Option<&str> {
        self.href_base.as_deref()
    }

    pub fn platform_scope(&self) -> Option<PlatformId> {
        self.platform_scope
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn platform_type_filters(&self) -> &BTreeSet<String> {
        &self.platform_type_filters
    }

    fn has_mobility_filter(&self) -> bool {
        self.platform_type_filters.contains(Mobility::Stationary.tag())
            || self.platform_type_filters.contains(Mobility::Mobile.tag())
    }

    fn has_sensing_filter(&self) -> bool {
        self.platform_type_filters.contains(SensingMode::Insitu.tag())
            || self.platform_type_filters.contains(SensingMode::Remote.tag())
    }

    /// No mobility tag present means both mobilities are included; a tag set
    /// narrows to the named ones. Same rule applies on the sensing axis.
    pub fn include_stationary_platform_types(&self) -> bool {
        !self.has_mobility_filter()
            || self.platform_type_filters.contains(Mobility::Stationary.tag())
    }

    pub fn include_mobile_platform_types(&self) -> bool {
        !self.has_mobility_filter() || self.platform_type_filters.contains(Mobility::Mobile.tag())
    }

    pub fn include_insitu_platform_types(&self) -> bool {
        !self.has_sensing_filter() || self.platform_type_filters.contains(SensingMode::Insitu.tag())
    }

    pub fn include_remote_platform_types(&self) -> bool {
        !self.has_sensing_filter() || self.platform_type_filters.contains(SensingMode::Remote.tag())
    }
}

/// One cell of the mobility × sensing-mode cross product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub mobility: Mobility,
    pub sensing_mode: SensingMode,
}

impl Partition {
    /// All partitions in fetch order
    pub const ALL: [Partition; 4] = [
        Partition {
            mobility: Mobility::Stationary,
            sensing_mode: SensingMode::Insitu,
        },
        Partition {
            mobility: Mobility::Stationary,
            sensing_mode: SensingMode::Remote,
        },
        Partition {
            mobility: Mobility::Mobile,
            sensing_mode: SensingMode::Insitu,
        },
        Partition {
            mobility: Mobility::Mobile,
            sensing_mode: SensingMode::Remote,
        },
    ];

    /// Partitions selected by the query's filter flags, in fetch order.
    /// Dropping one axis half drops both partitions of that half.
    pub fn select(query: &Query) -> Vec<Partition> {
        Self::ALL
            .iter()
            .copied()
            .filter(|p| match p.mobility {
                Mobility::Stationary => query.include_stationary_platform_types(),
                Mobility::Mobile => query.include_mobile_platform_types(),
            })
            .filter(|p| match p.sensing_mode {
                SensingMode::Insitu => query.include_insitu_platform_types(),
                SensingMode::Remote => query.include_remote_platform_types(),
            })
            .collect()
    }

    /// Re-derive the query for this partition: strip all platform-type tags,
    /// then extend with exactly the two tags naming the partition.
    pub fn scoped_query(&self, query: &Query) -> Query {
        query
            .without_platform_type_filters()
            .with_platform_types([self.mobility.tag(), self.sensing_mode.tag()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_selects_all_partitions() {
        let query = Query::new();
        assert_eq!(Partition::select(&query), Partition::ALL.to_vec());
    }

    #[test]
    fn mobility_filter_drops_the_other_half() {
        let query = Query::new().with_platform_types(["stationary"]);
        let selected = Partition::select(&query);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|p| p.mobility == Mobility::Stationary));
        assert_eq!(selected[0].sensing_mode, SensingMode::Insitu);
        assert_eq!(selected[1].sensing_mode, SensingMode::Remote);
    }

    #[test]
    fn sensing_filter_crosses_both_mobilities() {
        let query = Query::new().with_platform_types(["insitu"]);
        let selected = Partition::select(&query);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|p| p.sensing_mode == SensingMode::Insitu));
        assert_eq!(selected[0].mobility, Mobility::Stationary);
        assert_eq!(selected[1].mobility, Mobility::Mobile);
    }

    #[test]
    fn both_axes_filtered_selects_single_partition() {
        let query = Query::new().with_platform_types(["mobile", "remote"]);
        assert_eq!(
            Partition::select(&query),
            vec![Partition {
                mobility: Mobility::Mobile,
                sensing_mode: SensingMode::Remote,
            }]
        );
    }

    #[test]
    fn scoped_query_carries_exactly_the_partition_tags() {
        let original = Query::new()
            .with_locale("de")
            .with_platform_types(["mobile", "insitu", "remote"]);
        let partition = Partition {
            mobility: Mobility::Stationary,
            sensing_mode: SensingMode::Remote,
        };
        let scoped = partition.scoped_query(&original);

        let tags: Vec<&str> = scoped.platform_type_filters().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["remote", "stationary"]);
        assert_eq!(scoped.locale(), Some("de"));
        // original is untouched
        assert_eq!(original.platform_type_filters().len(), 3);
    }

    #[test]
    fn derivations_never_mutate_the_source() {
        let original = Query::new().with_platform_types(["stationary", "insitu"]);
        let id = PlatformId::new(Mobility::Stationary, SensingMode::Insitu, 42);

        let stripped = original.without_platform_type_filters();
        let scoped = original.scoped_to_platform(id);

        assert_eq!(original.platform_type_filters().len(), 2);
        assert_eq!(original.platform_scope(), None);
        assert!(stripped.platform_type_filters().is_empty());
        assert_eq!(scoped.platform_scope(), Some(id));
    }

    #[test]
    fn filter_flags_follow_tag_presence() {
        let query = Query::new().with_platform_types(["stationary"]);
        assert!(query.include_stationary_platform_types());
        assert!(!query.include_mobile_platform_types());
        // no sensing tag set: both sensing modes stay included
        assert!(query.include_insitu_platform_types());
        assert!(query.include_remote_platform_types());
    }
}
