//! Data models for the Skycast dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Weather: Per-fetch view models (current conditions, daily, hourly)

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use weather::{
    CurrentConditions, DailySummary, FavoriteLocation, HourlySample, WeatherSnapshot,
};
