//! Weather view models produced per fetch
//!
//! All of these are immutable value objects: they are built once from a
//! provider response, handed to the frontend, and replaced wholesale by the
//! next fetch. Numeric fields are imperial, converted at ingestion.

use super::Location;
use serde::{Deserialize, Serialize};

/// Current conditions for one location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentConditions {
    pub location: Location,
    /// Temperature in °F, rounded
    pub temperature: i32,
    /// Apparent temperature in °F, rounded
    pub feels_like: i32,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Weather condition icon ID from the provider
    pub icon: String,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in mph, rounded
    pub wind_speed: i32,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: u16,
    /// Atmospheric pressure in hPa (display converts to inHg)
    pub pressure: f64,
    /// Visibility in miles, rounded
    pub visibility: i32,
    /// UV index; the current-conditions endpoint does not carry it
    pub uv_index: u8,
    /// Sunrise as Unix epoch seconds
    pub sunrise: i64,
    /// Sunset as Unix epoch seconds
    pub sunset: i64,
    /// When this reading was ingested, Unix epoch milliseconds
    pub last_updated: i64,
}

impl CurrentConditions {
    /// Wind direction as a cardinal label for the dashboard cards
    #[must_use]
    pub fn wind_cardinal(&self) -> &'static str {
        wind_direction_to_cardinal(self.wind_direction)
    }

    /// Pressure in inches of mercury; display conversion only, never stored
    #[must_use]
    pub fn pressure_inhg(&self) -> f64 {
        self.pressure * 0.029_53
    }
}

/// Convert wind direction from degrees to cardinal direction
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    match degrees {
        0..=11 | 349..=360 => "N",
        12..=33 => "NNE",
        34..=56 => "NE",
        57..=78 => "ENE",
        79..=101 => "E",
        102..=123 => "ESE",
        124..=146 => "SE",
        147..=168 => "SSE",
        169..=191 => "S",
        192..=213 => "SSW",
        214..=236 => "SW",
        237..=258 => "WSW",
        259..=281 => "W",
        282..=303 => "WNW",
        304..=326 => "NW",
        327..=348 => "NNW",
        _ => "Unknown",
    }
}

/// One calendar day aggregated from the 3-hourly forecast samples
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    /// Calendar date, ISO format (YYYY-MM-DD)
    pub date: String,
    /// Weekday name for the card header
    pub day_name: String,
    /// Maximum over the day's sample maxima, °F rounded
    pub high: i32,
    /// Minimum over the day's sample minima, °F rounded
    pub low: i32,
    /// Description from the day's first sample
    pub description: String,
    /// Icon from the day's first sample
    pub icon: String,
    /// Probability of precipitation from the day's first sample, 0-100
    pub precipitation_chance: u8,
}

/// Direct projection of one raw forecast sample
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySample {
    /// Sample timestamp, Unix epoch seconds
    pub time: i64,
    /// Temperature in °F, rounded
    pub temperature: i32,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation, 0-100
    pub precipitation_chance: u8,
}

/// Complete weather bundle for one location at one point in time
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    /// At most 7 entries, in first-seen-date order
    pub daily: Vec<DailySummary>,
    /// At most 8 entries, in input order
    pub hourly: Vec<HourlySample>,
}

/// A user-pinned location retained across sessions
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FavoriteLocation {
    pub id: String,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Last-known temperature snapshot, °F
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<Location> for FavoriteLocation {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            country: location.country,
            lat: location.lat,
            lon: location.lon,
            temperature: None,
            description: None,
            icon: None,
        }
    }
}
