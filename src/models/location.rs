//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// A geocoded place the dashboard can show weather for
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Location {
    /// Stable identity, derived from the coordinate pair
    pub id: String,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Location {
    /// Create a new location; the id is synthesized from the coordinates
    #[must_use]
    pub fn new(name: String, country: String, lat: f64, lon: f64) -> Self {
        Self {
            id: Self::make_id(lat, lon),
            name,
            country,
            lat,
            lon,
        }
    }

    /// Deterministic identity for a coordinate pair, stable across calls
    #[must_use]
    pub fn make_id(lat: f64, lon: f64) -> String {
        format!("{lat}-{lon}")
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(lat: f64, lon: f64, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        (
            (lat * multiplier).round() / multiplier,
            (lon * multiplier).round() / multiplier,
        )
    }

    /// Generate the snapshot cache key for a coordinate pair
    #[must_use]
    pub fn snapshot_cache_key(lat: f64, lon: f64) -> String {
        let (lat, lon) = Self::rounded_coordinates(lat, lon, 2);
        format!("snapshot:{lat:.2}:{lon:.2}")
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Location {}
