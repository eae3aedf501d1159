//! Unified platform shapes and output views
//!
//! [`PlatformEntity`] is the unified record both backing sources resolve
//! into; the assembler projects it into the serializable output views
//! ([`CondensedPlatform`], [`ExpandedPlatform`], [`SearchResult`]).
//!
//! Record capabilities (label selection, geometry access) are expressed as
//! small traits implemented per concrete record type and composed, rather
//! than through a shared base type.

use crate::geometry::Geometry;
use crate::platform_id::PlatformId;
use crate::readers::DatasetType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Locale-aware label selection with fallback to the record name
pub trait HasLabel {
    fn name(&self) -> &str;

    fn translation(&self, locale: &str) -> Option<&str>;

    fn label_from(&self, locale: Option<&str>) -> String {
        locale
            .and_then(|l| self.translation(l))
            .unwrap_or_else(|| self.name())
            .to_string()
    }
}

/// Static geometry access
pub trait HasGeometry {
    fn geometry(&self) -> Option<Geometry>;
}

/// Unified platform record, independent of which source backed it
#[derive(Debug, Clone)]
pub struct PlatformEntity {
    pub id: PlatformId,
    pub domain_id: String,
    pub name: String,
    pub translations: BTreeMap<String, String>,
    pub description: Option<String>,
    pub geometry: Option<Geometry>,
}

impl HasLabel for PlatformEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn translation(&self, locale: &str) -> Option<&str> {
        self.translations.get(locale).map(String::as_str)
    }
}

impl HasGeometry for PlatformEntity {
    fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }
}

/// Opaque handle to one of a platform's datasets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRef {
    pub id: String,
    pub dataset_type: DatasetType,
}

/// Latest recorded observation of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingValue {
    pub timestamp: DateTime<Utc>,
    pub geometry: Option<Geometry>,
}

/// Identity-only platform projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensedPlatform {
    pub id: String,
    pub label: String,
    pub domain_id: String,
    pub href_base: String,
}

/// Condensed view plus dataset list and resolved geometry
#[derive(Debug, Clone, Serialize)]
pub struct ExpandedPlatform {
    #[serde(flatten)]
    pub condensed: CondensedPlatform,
    pub datasets: Vec<DatasetRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

/// One row of a platform search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub label: String,
    pub href_base: String,
}

/// Resolves collection href bases from the configured external URL,
/// honoring a per-query override.
#[derive(Debug, Clone)]
pub struct UrlHelper {
    external_url: String,
}

impl UrlHelper {
    pub fn new(external_url: impl Into<String>) -> Self {
        Self {
            external_url: external_url.into(),
        }
    }

    /// Href base of the platforms collection
    pub fn platforms_href_base(&self, href_base_override: Option<&str>) -> String {
        let base = href_base_override.unwrap_or(&self.external_url);
        format!("{}/platforms", base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_id::{Mobility, SensingMode};

    fn entity() -> PlatformEntity {
        PlatformEntity {
            id: PlatformId::new(Mobility::Stationary, SensingMode::Insitu, 42),
            domain_id: "sta-42".to_string(),
            name: "Lake buoy".to_string(),
            translations: BTreeMap::from([("de".to_string(), "Seeboje".to_string())]),
            description: None,
            geometry: None,
        }
    }

    #[test]
    fn label_prefers_requested_locale() {
        assert_eq!(entity().label_from(Some("de")), "Seeboje");
    }

    #[test]
    fn label_falls_back_to_name() {
        assert_eq!(entity().label_from(Some("fr")), "Lake buoy");
        assert_eq!(entity().label_from(None), "Lake buoy");
    }

    #[test]
    fn href_base_prefers_query_override() {
        let urls = UrlHelper::new("http://internal:8080/api");
        assert_eq!(
            urls.platforms_href_base(None),
            "http://internal:8080/api/platforms"
        );
        assert_eq!(
            urls.platforms_href_base(Some("https://public.example.org/api/")),
            "https://public.example.org/api/platforms"
        );
    }
}
