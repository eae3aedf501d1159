//! Point geometry value type
//!
//! Platform locations are points (WGS84 longitude/latitude, optional
//! altitude). Stored as nullable columns in SQLite; a record with no
//! coordinates simply has no geometry.

use serde::{Deserialize, Serialize};

/// A WGS84 point location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl Geometry {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }

    /// Build from nullable coordinate columns; both longitude and latitude
    /// must be present for a geometry to exist.
    pub fn from_columns(
        longitude: Option<f64>,
        latitude: Option<f64>,
        altitude: Option<f64>,
    ) -> Option<Self> {
        match (longitude, latitude) {
            (Some(longitude), Some(latitude)) => Some(Self {
                longitude,
                latitude,
                altitude,
            }),
            _ => None,
        }
    }
}
